use std::io::Cursor;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;
use tiff::ColorType;

use crate::features::layers::error::LayerError;
use crate::features::layers::models::{DeforestationRaster, GeoTransform};

// GeoTIFF tag numbers
const MODEL_PIXEL_SCALE: u16 = 33550;
const MODEL_TIEPOINT: u16 = 33922;
const GDAL_NODATA: u16 = 42113;

/// Decode a single-band, north-up GeoTIFF into a deforestation raster.
pub fn read_geotiff(bytes: &[u8]) -> Result<DeforestationRaster, LayerError> {
    let raster_err = |e: tiff::TiffError| LayerError::Raster(e.to_string());

    let mut decoder = Decoder::new(Cursor::new(bytes)).map_err(raster_err)?;
    let (width, height) = decoder.dimensions().map_err(raster_err)?;

    match decoder.colortype().map_err(raster_err)? {
        ColorType::Gray(_) => {}
        other => {
            return Err(LayerError::Raster(format!(
                "expected a single-band raster, got {:?}",
                other
            )))
        }
    }

    let scale = decoder
        .get_tag_f64_vec(Tag::from_u16_exhaustive(MODEL_PIXEL_SCALE))
        .map_err(|e| LayerError::Raster(format!("missing ModelPixelScale: {}", e)))?;
    let tiepoint = decoder
        .get_tag_f64_vec(Tag::from_u16_exhaustive(MODEL_TIEPOINT))
        .map_err(|e| LayerError::Raster(format!("missing ModelTiepoint: {}", e)))?;
    let transform = geo_transform(&scale, &tiepoint)?;

    let nodata = match decoder
        .find_tag(Tag::from_u16_exhaustive(GDAL_NODATA))
        .map_err(raster_err)?
    {
        Some(value) => value
            .into_string()
            .ok()
            .and_then(|s| parse_nodata(&s)),
        None => None,
    };

    let codes: Vec<u32> = match decoder.read_image().map_err(raster_err)? {
        DecodingResult::U8(v) => v.into_iter().map(u32::from).collect(),
        DecodingResult::U16(v) => v.into_iter().map(u32::from).collect(),
        DecodingResult::U32(v) => v,
        _ => {
            return Err(LayerError::Raster(
                "expected unsigned integer pixels".to_string(),
            ))
        }
    };

    tracing::debug!(
        "Decoded {}x{} deforestation raster (nodata: {:?})",
        width,
        height,
        nodata
    );

    DeforestationRaster::new(width, height, transform, nodata, codes)
        .ok_or_else(|| LayerError::Raster("pixel count or georeference mismatch".to_string()))
}

/// Build the affine transform from ModelPixelScale and the first ModelTiepoint
fn geo_transform(scale: &[f64], tiepoint: &[f64]) -> Result<GeoTransform, LayerError> {
    let (&[sx, sy, ..], &[i, j, _, x, y, ..]) = (scale, tiepoint) else {
        return Err(LayerError::Raster(
            "malformed georeference tags".to_string(),
        ));
    };

    Ok(GeoTransform {
        origin_x: x - i * sx,
        origin_y: y + j * sy,
        pixel_width: sx,
        pixel_height: sy,
    })
}

/// GDAL writes nodata as ASCII, e.g. "255" or "255.0"
fn parse_nodata(raw: &str) -> Option<u32> {
    let value: f64 = raw.trim_matches(char::from(0)).trim().parse().ok()?;
    if value.fract() == 0.0 && value >= 0.0 && value <= u32::MAX as f64 {
        Some(value as u32)
    } else {
        None
    }
}
