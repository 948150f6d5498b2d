use crate::error::FlowError;
use crate::pdf::refs::{ObjectReferences, RefType};
use image::DynamicImage;
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Pdf};
use std::path::Path;

/// A raster image embedded in the generated PDF as an image XObject.
/// Pixel data is zlib-compressed RGB; an alpha channel, when present,
/// becomes a separate soft mask.
pub struct EmbeddedImage {
    image: DynamicImage,
    pub width: u32,
    pub height: u32,
}

impl EmbeddedImage {
    pub fn load_from_disk<P: AsRef<Path>>(path: P) -> Result<EmbeddedImage, FlowError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => FlowError::ImageNotFound(path.to_owned()),
            _ => FlowError::Io(err),
        })?;
        let image = image::load_from_memory(&data)?;
        Ok(EmbeddedImage {
            width: image.width(),
            height: image.height(),
            image,
        })
    }

    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        image_index: usize,
        writer: &mut Pdf,
    ) -> Result<(), FlowError> {
        use image::GenericImageView;

        let id = refs.gen(RefType::Image(image_index));
        let level = CompressionLevel::DefaultLevel as u8;

        let mask = self.image.color().has_alpha().then(|| {
            let alphas: Vec<u8> = self.image.pixels().map(|p| (p.2).0[3]).collect();
            compress_to_vec_zlib(&alphas, level)
        });
        let bytes = compress_to_vec_zlib(self.image.to_rgb8().as_raw(), level);

        let mut image = writer.image_xobject(id, bytes.as_slice());
        image.filter(Filter::FlateDecode);
        image.width(self.width as i32);
        image.height(self.height as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);

        let mask_id = mask
            .as_ref()
            .map(|_| refs.gen(RefType::ImageMask(image_index)));
        if let Some(mask_id) = mask_id {
            image.s_mask(mask_id);
        }
        image.finish();

        if let (Some(mask), Some(mask_id)) = (mask, mask_id) {
            let mut s_mask = writer.image_xobject(mask_id, mask.as_slice());
            s_mask.filter(Filter::FlateDecode);
            s_mask.width(self.width as i32);
            s_mask.height(self.height as i32);
            s_mask.color_space().device_gray();
            s_mask.bits_per_component(8);
        }

        Ok(())
    }
}
