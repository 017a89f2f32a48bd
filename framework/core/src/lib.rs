mod stop;

pub mod prelude {
    pub use crate::stop::{DelegatedStopListener, StopHandle, StopSignalError};
}
