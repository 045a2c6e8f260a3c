pub mod export;
pub mod svg;

pub use export::{
    cutout_preview, decode_png_data_url, encode_png_data_url, DesignExport, ExportPaths,
    PNG_DATA_URL_PREFIX,
};
pub use svg::cut_svg;
