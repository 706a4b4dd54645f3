use std::fmt::{Display, Formatter};


pub type Result<T> = std::result::Result<T, Error>;


#[derive(Debug)]
pub enum Error {
    /// A read needed bytes at or beyond the logical length of the resource
    EndOfData {
        resource: String,
        position: u64,
        requested: u64,
        length: u64
    },
    /// Failure reported by the underlying source, passed through as is
    Io(std::io::Error),
    InvalidArgument(String),
    Corrupt {
        resource: String,
        message: String
    }
}


impl Error {
    pub(crate) fn eof(resource: &str, position: u64, requested: u64, length: u64) -> Self {
        Error::EndOfData {
            resource: resource.to_string(),
            position,
            requested,
            length
        }
    }

    pub(crate) fn corrupt<S: ToString>(resource: &str, message: S) -> Self {
        Error::Corrupt {
            resource: resource.to_string(),
            message: message.to_string()
        }
    }

    pub fn is_end_of_data(&self) -> bool {
        matches!(self, Error::EndOfData { .. })
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}


macro_rules! invalid_argument {
    ($($arg:tt)*) => {
        $crate::error::Error::InvalidArgument(format!($($arg)*))
    };
}
pub(crate) use invalid_argument;


impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::EndOfData { resource, position, requested, length } => write!(
                f,
                "read past EOF: {} (pos={}, requested={}, length={})",
                resource,
                position,
                requested,
                length
            ),
            Error::Io(err) => write!(f, "{}", err),
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            Error::Corrupt { resource, message } => write!(f, "{}: {}", resource, message)
        }
    }
}


impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None
        }
    }
}


impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io(value)
    }
}


impl From<Error> for std::io::Error {
    fn from(value: Error) -> Self {
        match value {
            Error::Io(err) => err,
            err @ Error::EndOfData { .. } => std::io::Error::new(std::io::ErrorKind::UnexpectedEof, err),
            err @ Error::InvalidArgument(_) => std::io::Error::new(std::io::ErrorKind::InvalidInput, err),
            err @ Error::Corrupt { .. } => std::io::Error::new(std::io::ErrorKind::InvalidData, err)
        }
    }
}


#[cfg(test)]
mod test {
    use super::Error;


    #[test]
    fn io_errors_are_passed_through_unchanged() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "disk went away");
        let err = Error::from(io);
        let Error::Io(inner) = err else {
            panic!("expected an I/O error")
        };
        assert_eq!(inner.kind(), std::io::ErrorKind::TimedOut);
        assert_eq!(inner.to_string(), "disk went away");
    }

    #[test]
    fn io_error_is_the_source() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "disk went away");
        let err = Error::from(io);
        let source = std::error::Error::source(&err).unwrap();
        let io = source.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io.kind(), std::io::ErrorKind::TimedOut);
    }

    #[test]
    fn end_of_data_message_names_the_resource() {
        let err = Error::eof("segment_1.tim", 10, 4, 12);
        assert!(err.is_end_of_data());
        assert_eq!(
            err.to_string(),
            "read past EOF: segment_1.tim (pos=10, requested=4, length=12)"
        );
    }
}
