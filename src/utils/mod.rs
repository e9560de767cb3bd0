pub mod file_magic;
pub mod multipart;
pub mod parameter_error_handler;

pub use file_magic::validate_magic_bytes;
pub use multipart::{MultipartForm, UploadRejection, UploadedFile, read_multipart_form};
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
