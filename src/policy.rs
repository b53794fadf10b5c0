use crate::error::DotenvError;
use std::{fmt, str::FromStr};

/// How the parser treats lines that are not `KEY=VALUE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ParseMode {
    /// Fail on the first malformed line
    #[default]
    Strict,
    /// Skip malformed lines silently
    Permissive,
}

/// What loading does when the `.env` file does not exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MissingPolicy {
    /// Report `DotenvError::SourceMissing`
    #[default]
    Fail,
    /// Continue with the host environment only
    Ignore,
}

impl FromStr for ParseMode {
    type Err = DotenvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(Self::Strict),
            "permissive" | "ignore" => Ok(Self::Permissive),
            _ => Err(DotenvError::InvalidValue {
                key: "on_malformed".to_string(),
                value: s.to_string(),
                expected: "'strict' or 'permissive'".to_string(),
            }),
        }
    }
}

impl FromStr for MissingPolicy {
    type Err = DotenvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fail" | "error" => Ok(Self::Fail),
            "ignore" => Ok(Self::Ignore),
            _ => Err(DotenvError::InvalidValue {
                key: "on_missing".to_string(),
                value: s.to_string(),
                expected: "'fail' or 'ignore'".to_string(),
            }),
        }
    }
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Permissive => write!(f, "permissive"),
        }
    }
}

impl fmt::Display for MissingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fail => write!(f, "fail"),
            Self::Ignore => write!(f, "ignore"),
        }
    }
}

impl ParseMode {
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Strict)
    }
}

impl MissingPolicy {
    pub fn is_ignore(&self) -> bool {
        matches!(self, Self::Ignore)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strict() {
        let mode: ParseMode = "strict".parse().unwrap();
        assert_eq!(mode, ParseMode::Strict);
    }

    #[test]
    fn test_parse_permissive_aliases() {
        assert_eq!("permissive".parse::<ParseMode>().unwrap(), ParseMode::Permissive);
        assert_eq!("ignore".parse::<ParseMode>().unwrap(), ParseMode::Permissive);
    }

    #[test]
    fn test_parse_mode_invalid() {
        let result: Result<ParseMode, DotenvError> = "lenient".parse();

        if let Err(DotenvError::InvalidValue {
            key,
            value,
            expected,
        }) = result
        {
            assert_eq!(key, "on_malformed");
            assert_eq!(value, "lenient");
            assert!(expected.contains("'strict' or 'permissive'"));
        } else {
            panic!("Expected InvalidValue error");
        }
    }

    #[test]
    fn test_parse_missing_policy() {
        assert_eq!("fail".parse::<MissingPolicy>().unwrap(), MissingPolicy::Fail);
        assert_eq!("error".parse::<MissingPolicy>().unwrap(), MissingPolicy::Fail);
        assert_eq!("ignore".parse::<MissingPolicy>().unwrap(), MissingPolicy::Ignore);
        assert!("skip".parse::<MissingPolicy>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for mode in [ParseMode::Strict, ParseMode::Permissive] {
            assert_eq!(mode.to_string().parse::<ParseMode>().unwrap(), mode);
        }
        for policy in [MissingPolicy::Fail, MissingPolicy::Ignore] {
            assert_eq!(policy.to_string().parse::<MissingPolicy>().unwrap(), policy);
        }
    }

    #[test]
    fn test_defaults() {
        assert!(ParseMode::default().is_strict());
        assert!(!MissingPolicy::default().is_ignore());
    }
}
