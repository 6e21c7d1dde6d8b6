pub mod comment;
pub mod video;

pub use comment::CommentRecord;
pub use video::VideoRef;
