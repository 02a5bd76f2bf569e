use thiserror::Error;

pub type Result<T> = std::result::Result<T, LocError>;

#[derive(Error, Debug)]
pub enum LocError {
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Object find error: {0}")]
    ObjectFind(#[from] Box<gix::object::find::existing::Error>),
    #[error("Reference find error: {0}")]
    RefFind(#[from] Box<gix::reference::find::existing::Error>),
    #[error("Head peel error: {0}")]
    HeadPeel(#[from] Box<gix::head::peel::to_commit::Error>),
    #[error("Object find with conversion error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Object decode error: {0}")]
    ObjectDecode(#[from] Box<gix::objs::decode::Error>),
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
}

impl LocError {
    pub fn config(msg: impl Into<String>) -> Self {
        LocError::Config(msg.into())
    }
}

// gix errors are large; box them on the way in
impl From<gix::object::find::existing::Error> for LocError {
    fn from(err: gix::object::find::existing::Error) -> Self {
        LocError::ObjectFind(Box::new(err))
    }
}

impl From<gix::reference::find::existing::Error> for LocError {
    fn from(err: gix::reference::find::existing::Error) -> Self {
        LocError::RefFind(Box::new(err))
    }
}

impl From<gix::head::peel::to_commit::Error> for LocError {
    fn from(err: gix::head::peel::to_commit::Error) -> Self {
        LocError::HeadPeel(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for LocError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        LocError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for LocError {
    fn from(err: gix::object::commit::Error) -> Self {
        LocError::Commit(Box::new(err))
    }
}

impl From<gix::objs::decode::Error> for LocError {
    fn from(err: gix::objs::decode::Error) -> Self {
        LocError::ObjectDecode(Box::new(err))
    }
}

impl From<gix::discover::Error> for LocError {
    fn from(err: gix::discover::Error) -> Self {
        LocError::GitDiscover(Box::new(err))
    }
}
