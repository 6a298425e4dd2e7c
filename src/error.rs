use thiserror::Error;

pub type UpdaterResult<T> = Result<T, UpdaterError>;

#[derive(Error, Debug)]
pub enum UpdaterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Layout config error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Required sheet '{0}' not found")]
    MissingSheet(String),

    #[error("Column '{0}' not found in '{1}' sheet")]
    MissingColumn(String, String),

    #[error("Please select at least one item to update")]
    NoTargetsSelected,

    #[error("No {0} selected")]
    NothingSelected(&'static str),

    #[error("Unknown {kind} '{value}'")]
    UnknownChoice { kind: &'static str, value: String },

    #[error("Selected company '{company}' and variety '{variety}' not found")]
    SelectionNotFound { company: String, variety: String },
}

impl UpdaterError {
    /// True for errors the operator can fix by changing their input and retrying.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            UpdaterError::NoTargetsSelected
                | UpdaterError::NothingSelected(_)
                | UpdaterError::UnknownChoice { .. }
        )
    }

    /// True for errors caused by the uploaded workbook's shape.
    pub fn is_layout_error(&self) -> bool {
        matches!(
            self,
            UpdaterError::MissingSheet(_)
                | UpdaterError::MissingColumn(..)
                | UpdaterError::Workbook(_)
        )
    }
}
