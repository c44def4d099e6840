use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt::Display;

use crate::codec::Format;
use crate::error::ArchiveError;
use crate::registry::TypeRegistry;

// -----------------------------------------------------------------------------
// ArchiveSession

/// Per call state of one serialize or deserialize operation.
///
/// serde errors are strings, so the first framework error is kept here and
/// returned by [`finish`](ArchiveSession::finish) in place of the format error
/// that carried it out.
pub(crate) struct ArchiveSession<'a> {
    registry: &'a TypeRegistry,
    format: Format,
    max_depth: usize,
    depth: Cell<usize>,
    path: RefCell<Vec<&'static str>>,
    failure: RefCell<Option<ArchiveError>>,
    #[cfg(all(debug_assertions, feature = "debug"))]
    types: RefCell<Vec<&'static str>>,
}

impl<'a> ArchiveSession<'a> {
    pub fn new(registry: &'a TypeRegistry, format: Format, max_depth: usize) -> Self {
        Self {
            registry,
            format,
            max_depth,
            depth: Cell::new(0),
            path: RefCell::new(Vec::new()),
            failure: RefCell::new(None),
            #[cfg(all(debug_assertions, feature = "debug"))]
            types: RefCell::new(Vec::new()),
        }
    }

    #[inline(always)]
    pub fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    #[inline(always)]
    pub fn format(&self) -> Format {
        self.format
    }

    /// Enters one object level, failing past the depth limit.
    pub fn enter(&self, type_path: &'static str) -> Result<DepthGuard<'_>, ArchiveError> {
        let depth = self.depth.get();
        if depth >= self.max_depth {
            return Err(self.fail(ArchiveError::DepthExceeded {
                limit: self.max_depth,
            }));
        }
        self.depth.set(depth + 1);

        #[cfg(all(debug_assertions, feature = "debug"))]
        self.types.borrow_mut().push(type_path);
        #[cfg(not(all(debug_assertions, feature = "debug")))]
        let _ = type_path;

        Ok(DepthGuard { session: self })
    }

    /// Appends `name` to the field path until the guard is dropped.
    pub fn field(&self, name: &'static str) -> FieldGuard<'_> {
        self.path.borrow_mut().push(name);
        FieldGuard { session: self }
    }

    /// Records `err` unless an earlier error was recorded, and returns it.
    pub fn fail(&self, err: ArchiveError) -> ArchiveError {
        let mut failure = self.failure.borrow_mut();
        if failure.is_none() {
            *failure = Some(err.clone());
        }
        err
    }

    /// Records a format error as a codec error at the current field, unless
    /// an earlier error was recorded, and returns it.
    ///
    /// The innermost field sees the error first, so the recorded path is the
    /// deepest one.
    pub fn codec<E: Display>(&self, err: E) -> E {
        let mut failure = self.failure.borrow_mut();
        if failure.is_none() {
            *failure = Some(ArchiveError::Codec {
                field: self.field_path(),
                message: self.describe(err.to_string()),
            });
        }
        err
    }

    fn field_path(&self) -> String {
        let path = self.path.borrow();
        if path.is_empty() {
            String::from("<root>")
        } else {
            path.join(".")
        }
    }

    #[cfg(all(debug_assertions, feature = "debug"))]
    fn describe(&self, message: String) -> String {
        let types = self.types.borrow();
        if types.is_empty() {
            message
        } else {
            alloc::format!("{message} (stack: {})", types.join(" -> "))
        }
    }

    #[cfg(not(all(debug_assertions, feature = "debug")))]
    #[inline(always)]
    fn describe(&self, message: String) -> String {
        message
    }

    /// Turns the result of a whole format call into the public error type.
    pub fn finish<T>(self, result: Result<T, String>) -> Result<T, ArchiveError> {
        match result {
            Ok(value) => Ok(value),
            Err(message) => match self.failure.into_inner() {
                Some(err) => Err(err),
                None => Err(ArchiveError::codec_at_root(message)),
            },
        }
    }
}

// -----------------------------------------------------------------------------
// Guards

pub(crate) struct DepthGuard<'s> {
    session: &'s ArchiveSession<'s>,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        let depth = &self.session.depth;
        depth.set(depth.get() - 1);

        #[cfg(all(debug_assertions, feature = "debug"))]
        self.session.types.borrow_mut().pop();
    }
}

pub(crate) struct FieldGuard<'s> {
    session: &'s ArchiveSession<'s>,
}

impl Drop for FieldGuard<'_> {
    fn drop(&mut self) {
        self.session.path.borrow_mut().pop();
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::ArchiveSession;
    use crate::codec::Format;
    use crate::error::ArchiveError;
    use crate::registry::TypeRegistry;

    #[test]
    fn depth_limit() {
        let registry = TypeRegistry::new();
        let session = ArchiveSession::new(&registry, Format::Binary, 2);

        let first = session.enter("a").unwrap();
        let second = session.enter("b").unwrap();
        assert!(session.enter("c").is_err());
        drop(second);
        assert!(session.enter("c").is_ok());
        drop(first);

        let result: Result<(), String> = Err(String::from("depth"));
        assert_eq!(
            session.finish(result),
            Err(ArchiveError::DepthExceeded { limit: 2 })
        );
    }

    #[test]
    fn first_codec_error_wins() {
        let registry = TypeRegistry::new();
        let session = ArchiveSession::new(&registry, Format::Text, 8);

        {
            let _owner = session.field("owner");
            let _name = session.field("name");
            session.codec("bad string");
        }
        session.codec("outer");

        let result: Result<(), String> = Err(String::from("outer"));
        match session.finish(result) {
            Err(ArchiveError::Codec { field, message }) => {
                assert_eq!(field, "owner.name");
                assert!(message.starts_with("bad string"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn root_fallback() {
        let registry = TypeRegistry::new();
        let session = ArchiveSession::new(&registry, Format::Binary, 8);

        let result: Result<(), String> = Err(String::from("3 trailing bytes"));
        assert_eq!(
            session.finish(result),
            Err(ArchiveError::codec_at_root("3 trailing bytes"))
        );
    }
}
