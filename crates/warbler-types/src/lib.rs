pub mod api;
pub mod forms;

/// Profile image applied when a signup or edit leaves `image_url` blank.
pub const DEFAULT_IMAGE_URL: &str = "/static/images/default-pic.png";

/// Header image applied when a profile edit leaves `header_image_url` blank.
pub const DEFAULT_HEADER_IMAGE_URL: &str =
    "https://www.allaboutbirds.org/guide/assets/photo/297046671-1280px.jpg";

/// Upper bound on message text, in characters.
pub const MAX_MESSAGE_LEN: usize = 140;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;
