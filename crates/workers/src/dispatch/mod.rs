mod dispatcher;

pub use dispatcher::{AlertDispatcher, DispatchReport};
