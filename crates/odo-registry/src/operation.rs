use crate::error::{RegistryError, RegistryResult};

/// A caller-facing operation, parsed from its name and positional arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    /// `addNewReading(jsonRecord)`
    AddNewReading(String),
    /// `updateReading(jsonRecord)`
    UpdateReading(String),
    /// `removeAllReadings()`
    RemoveAllReadings,
    /// `readReading(id)`
    ReadReading(String),
    /// `readAllReadings()`
    ReadAllReadings,
}

impl Operation {
    pub const ADD_NEW_READING: &'static str = "addNewReading";
    pub const UPDATE_READING: &'static str = "updateReading";
    pub const REMOVE_ALL_READINGS: &'static str = "removeAllReadings";
    pub const READ_READING: &'static str = "readReading";
    pub const READ_ALL_READINGS: &'static str = "readAllReadings";

    /// Every operation name, in the order they are documented.
    pub const NAMES: [&'static str; 5] = [
        Self::ADD_NEW_READING,
        Self::UPDATE_READING,
        Self::REMOVE_ALL_READINGS,
        Self::READ_READING,
        Self::READ_ALL_READINGS,
    ];

    /// Resolve `function` and check the argument count.
    pub fn parse<S: AsRef<str>>(function: &str, args: &[S]) -> RegistryResult<Self> {
        let op = match function {
            Self::ADD_NEW_READING => Self::AddNewReading(single_arg(function, args)?),
            Self::UPDATE_READING => Self::UpdateReading(single_arg(function, args)?),
            Self::REMOVE_ALL_READINGS => {
                no_args(function, args)?;
                Self::RemoveAllReadings
            }
            Self::READ_READING => Self::ReadReading(single_arg(function, args)?),
            Self::READ_ALL_READINGS => {
                no_args(function, args)?;
                Self::ReadAllReadings
            }
            other => return Err(RegistryError::UnknownOperation(other.to_string())),
        };
        Ok(op)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::AddNewReading(_) => Self::ADD_NEW_READING,
            Self::UpdateReading(_) => Self::UPDATE_READING,
            Self::RemoveAllReadings => Self::REMOVE_ALL_READINGS,
            Self::ReadReading(_) => Self::READ_READING,
            Self::ReadAllReadings => Self::READ_ALL_READINGS,
        }
    }
}

fn single_arg<S: AsRef<str>>(function: &str, args: &[S]) -> RegistryResult<String> {
    match args {
        [arg] => Ok(arg.as_ref().to_string()),
        _ => Err(RegistryError::MalformedInput(format!(
            "{function} expects 1 argument, got {}",
            args.len()
        ))),
    }
}

fn no_args<S: AsRef<str>>(function: &str, args: &[S]) -> RegistryResult<()> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(RegistryError::MalformedInput(format!(
            "{function} expects no arguments, got {}",
            args.len()
        )))
    }
}
