//! `multipart/form-data` body for the alternative payload shape.

use crate::image::ImageRef;

/// Build the body: `prompt`, then one part per image in order.
///
/// URL references go out as `image_urls` text fields, uploads as raw
/// `image` file parts.
pub(super) fn build_generation_multipart(
    boundary: &str,
    prompt: &str,
    images: &[ImageRef],
) -> Vec<u8> {
    let inline_len: usize = images
        .iter()
        .map(|image| match image {
            ImageRef::Inline(inline) => inline.data.len(),
            ImageRef::Url(url) => url.len(),
        })
        .sum();
    let mut body = Vec::with_capacity(inline_len + prompt.len() + 256 * (images.len() + 1));

    append_field(&mut body, boundary, "prompt", prompt);
    for image in images {
        match image {
            ImageRef::Url(url) => append_field(&mut body, boundary, "image_urls", url),
            ImageRef::Inline(inline) => {
                body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\n",
                        escape_quotes(&inline.part_file_name())
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(
                    format!("Content-Type: {}\r\n\r\n", inline.mime_type).as_bytes(),
                );
                body.extend_from_slice(&inline.data);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    body
}

fn append_field(body: &mut Vec<u8>, boundary: &str, name: &str, value: &str) {
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
    );
    body.extend_from_slice(value.as_bytes());
    body.extend_from_slice(b"\r\n");
}

fn escape_quotes(value: &str) -> String {
    value.replace('"', "%22")
}
