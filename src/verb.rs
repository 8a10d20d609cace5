use std::fmt;

use bctoolkit_catalog::Action;

use crate::error::CliError;

/// The resolved `<resource> [<subresource>] <action>` triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Verb {
    pub resource: String,
    pub subresource: Option<String>,
    pub action: Action,
}

impl Verb {
    pub fn new(resource: &str, subresource: Option<&str>, action: Action) -> Self {
        Self {
            resource: normalize(resource),
            subresource: subresource.map(normalize),
            action,
        }
    }

    /// Build a verb from the positional words preceding the first `--` token.
    pub fn from_words(words: &[String]) -> Result<Self, CliError> {
        let (resource, subresource, action) = match words {
            [resource, action] => (resource, None, action),
            [resource, subresource, action] => (resource, Some(subresource.as_str()), action),
            _ => return Err(CliError::UnknownVerb(words.join(" "))),
        };
        let action = action
            .parse::<Action>()
            .map_err(|_| CliError::UnknownVerb(words.join(" ")))?;
        Ok(Self::new(resource, subresource, action))
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resource)?;
        if let Some(sub) = &self.subresource {
            write!(f, " {sub}")?;
        }
        write!(f, " {}", self.action)
    }
}

fn normalize(word: &str) -> String {
    word.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn two_words_have_no_subresource() {
        let verb = Verb::from_words(&words(&["Products", "GET-ALL"])).expect("verb");
        assert_eq!(verb, Verb::new("products", None, Action::GetAll));
        assert_eq!(verb.to_string(), "products get-all");
    }

    #[test]
    fn three_words_carry_a_subresource() {
        let verb = Verb::from_words(&words(&["product", "metafields", "add"])).expect("verb");
        assert_eq!(verb.subresource.as_deref(), Some("metafields"));
        assert_eq!(verb.action, Action::Add);
    }

    #[test]
    fn wrong_arity_or_action_is_unknown_verb() {
        for raw in [&["products"][..], &["a", "b", "c", "get"], &["products", "fly"]] {
            let err = Verb::from_words(&words(raw)).expect_err("should fail");
            assert!(matches!(err, CliError::UnknownVerb(_)), "{raw:?}");
        }
    }
}
