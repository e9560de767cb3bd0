pub mod assessments;

pub mod assignments;

pub mod evaluations;

pub mod extraction;

pub mod files;

pub mod submissions;

pub use assessments::configure_assessments_routes;
pub use assignments::configure_assignments_routes;
pub use evaluations::configure_evaluations_routes;
pub use extraction::configure_extraction_routes;
pub use files::configure_file_routes;
pub use submissions::configure_submissions_routes;
