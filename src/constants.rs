pub mod inventory {

    pub const DEFAULT_PURCHASE_QUANTITY: i64 = 1;

    pub const DEFAULT_RESTOCK_AMOUNT: i64 = 10;
}

pub mod images {

    pub const DEFAULT_EXTENSION: &str = "jpg";

    /// Raster formats only; SVG can carry script.
    pub const ALLOWED_CONTENT_TYPES: &[&str] =
        &["image/png", "image/jpeg", "image/gif", "image/webp"];

    pub const FORM_FIELD: &str = "image";
}

pub mod http {

    /// Slack on top of the image limit for the remaining form fields.
    pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;
}
