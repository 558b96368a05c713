use std::io::Cursor;

use image::{ImageOutputFormat, Rgb, RgbImage};
use polybot::dispatch::message::{Chat, Message, PhotoSize};
use polybot::PixelMatrix;

/// Row-major matrix from literal rows.
pub fn matrix(rows: &[&[f64]]) -> PixelMatrix {
    PixelMatrix::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
}

/// `rows × cols` matrix where cell (i, j) = i * cols + j.
pub fn ramp(rows: usize, cols: usize) -> PixelMatrix {
    PixelMatrix::from_rows(
        (0..rows)
            .map(|i| (0..cols).map(|j| (i * cols + j) as f64).collect())
            .collect(),
    )
    .unwrap()
}

/// PNG bytes of a `width × height` gray image with a left-to-right ramp.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, _| {
        let v = (x * 10 % 256) as u8;
        Rgb([v, v, v])
    });
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, ImageOutputFormat::Png)
        .unwrap();
    out.into_inner()
}

pub fn photo_message(chat_id: i64, message_id: i64, file_id: &str, caption: Option<&str>) -> Message {
    Message {
        message_id,
        chat: Chat { id: chat_id },
        text: None,
        caption: caption.map(str::to_owned),
        photo: Some(vec![
            PhotoSize { file_id: format!("{}-thumb", file_id), width: 1, height: 1 },
            PhotoSize { file_id: file_id.to_owned(), width: 0, height: 0 },
        ]),
    }
}

pub fn text_message(chat_id: i64, message_id: i64, text: &str) -> Message {
    Message {
        message_id,
        chat: Chat { id: chat_id },
        text: Some(text.to_owned()),
        caption: None,
        photo: None,
    }
}
