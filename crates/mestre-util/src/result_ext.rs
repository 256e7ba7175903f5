use std::{fmt::Display, path::Path};

pub trait ResultExt<T, InitialError> {
    /// Turn the error into its `Display` text and hand it to a string-carrying variant
    ///
    /// # Example
    /// ```rust
    /// use mestre_util::result_ext::ResultExt;
    ///
    /// #[derive(Debug, thiserror::Error)]
    /// enum StoreError {
    ///     #[error("unable to read store: {0}")]
    ///     Read(String),
    /// }
    ///
    /// fn load() -> Result<String, StoreError> {
    ///     std::fs::read_to_string("missing-keys.json").map_err_str(StoreError::Read)
    /// }
    ///
    /// assert!(load().is_err());
    /// ```
    fn map_err_str<FinalError, F>(self, f: F) -> Result<T, FinalError>
    where
        InitialError: Display,
        F: FnOnce(String) -> FinalError;

    /// Same as [`ResultExt::map_err_str`] with the file path in front, `"<path>: <error>"`
    fn map_err_path<FinalError, F>(self, path: &Path, f: F) -> Result<T, FinalError>
    where
        InitialError: Display,
        F: FnOnce(String) -> FinalError;
}

impl<Type, InitialError> ResultExt<Type, InitialError> for Result<Type, InitialError> {
    fn map_err_str<FinalError, F>(self, f: F) -> Result<Type, FinalError>
    where
        InitialError: Display,
        F: FnOnce(String) -> FinalError,
    {
        self.map_err(|e| f(e.to_string()))
    }

    fn map_err_path<FinalError, F>(self, path: &Path, f: F) -> Result<Type, FinalError>
    where
        InitialError: Display,
        F: FnOnce(String) -> FinalError,
    {
        self.map_err(|e| f(format!("{}: {e}", path.display())))
    }
}
