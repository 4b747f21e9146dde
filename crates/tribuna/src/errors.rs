use thiserror::Error;

// Errors escaping main() are printed through Debug, so point Debug at
// Display to keep the message readable.
macro_rules! impl_debug_for_error {
    ($error:ty) => {
        impl std::fmt::Debug for $error {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(self, f)
            }
        }
    };
}

#[derive(Error)]
pub enum BuildError {
    #[error(
        "Multiple routes declare the pattern {pattern:?}. Every route in the table must own a unique pattern."
    )]
    DuplicateRoute { pattern: String },
}

impl_debug_for_error!(BuildError);
