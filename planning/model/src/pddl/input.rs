use std::convert::TryFrom;

/// Text of a PDDL file, together with the path it was read from (if any).
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Input {
    pub(crate) text: String,
    pub(crate) source: Option<String>,
}

impl Input {
    pub fn from_string(input: impl ToString) -> Input {
        Input {
            text: input.to_string(),
            source: None,
        }
    }

    pub fn from_file(file: &std::path::Path) -> std::result::Result<Input, std::io::Error> {
        let s = std::fs::read_to_string(file)?;
        Ok(Input {
            text: s,
            source: Some(file.display().to_string()),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl From<&str> for Input {
    fn from(s: &str) -> Self {
        Input::from_string(s)
    }
}

impl TryFrom<&std::path::Path> for Input {
    type Error = std::io::Error;

    fn try_from(path: &std::path::Path) -> Result<Self, Self::Error> {
        Input::from_file(path)
    }
}
