use crate::shared::constants::DEFORESTATION_YEAR_CODES;

/// North-up affine georeference: top-left corner and pixel size in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub origin_y: f64,
    pub pixel_width: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    /// (col, row) of the pixel containing the coordinate, unbounded
    fn pixel_of(&self, lon: f64, lat: f64) -> (f64, f64) {
        let col = ((lon - self.origin_x) / self.pixel_width).floor();
        let row = ((self.origin_y - lat) / self.pixel_height).floor();
        (col, row)
    }
}

/// Single-band grid of deforestation year-bucket codes
#[derive(Debug, Clone)]
pub struct DeforestationRaster {
    width: u32,
    height: u32,
    transform: GeoTransform,
    nodata: Option<u32>,
    codes: Vec<u32>,
}

impl DeforestationRaster {
    /// `codes` are row-major, `width * height` long.
    pub fn new(
        width: u32,
        height: u32,
        transform: GeoTransform,
        nodata: Option<u32>,
        codes: Vec<u32>,
    ) -> Option<Self> {
        let valid_transform = transform.pixel_width > 0.0 && transform.pixel_height > 0.0;
        if codes.len() != width as usize * height as usize || !valid_transform {
            return None;
        }

        Some(Self {
            width,
            height,
            transform,
            nodata,
            codes,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw cell code at a lon/lat, `None` outside the grid or on nodata
    pub fn code_at(&self, lon: f64, lat: f64) -> Option<u32> {
        let (col, row) = self.transform.pixel_of(lon, lat);
        if !col.is_finite() || !row.is_finite() || col < 0.0 || row < 0.0 {
            return None;
        }

        let (col, row) = (col as u64, row as u64);
        if col >= self.width as u64 || row >= self.height as u64 {
            return None;
        }

        let code = self.codes[(row * self.width as u64 + col) as usize];
        match self.nodata {
            Some(nodata) if nodata == code => None,
            _ => Some(code),
        }
    }

    /// Deforestation year for the cell under the coordinate
    pub fn deforestation_year(&self, lon: f64, lat: f64) -> Option<i32> {
        let code = self.code_at(lon, lat)?;
        DEFORESTATION_YEAR_CODES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, year)| *year)
    }
}
