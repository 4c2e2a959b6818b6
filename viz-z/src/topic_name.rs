//! Topic name qualification and expansion, following ROS 2 rules.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicNameError {
    Empty,
    EndsWithSlash,
    InvalidCharacters(String),
    InvalidNamespace(String),
    InvalidNodeName(String),
}

impl std::fmt::Display for TopicNameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "Topic name is empty"),
            Self::EndsWithSlash => write!(f, "Topic name ends with forward slash"),
            Self::InvalidCharacters(s) => {
                write!(f, "Topic name contains invalid characters: {}", s)
            }
            Self::InvalidNamespace(s) => write!(f, "Invalid namespace: {}", s),
            Self::InvalidNodeName(s) => write!(f, "Invalid node name: {}", s),
        }
    }
}

impl std::error::Error for TopicNameError {}

/// Components must start with a letter or underscore, then alphanumerics or underscores.
fn is_valid_topic_component(component: &str) -> bool {
    let Some(first) = component.as_bytes().first() else {
        return false;
    };
    if !first.is_ascii_alphabetic() && *first != b'_' {
        return false;
    }
    component.as_bytes()[1..]
        .iter()
        .all(|&b| b.is_ascii_alphanumeric() || b == b'_')
}

fn validate_namespace(namespace: &str) -> Result<(), TopicNameError> {
    if namespace.is_empty() || namespace == "/" {
        return Ok(());
    }
    if namespace.ends_with('/') {
        return Err(TopicNameError::InvalidNamespace(
            "namespace cannot end with '/'".to_string(),
        ));
    }
    for part in namespace.split('/') {
        if part.is_empty() {
            // Leading slash creates an empty first component
            continue;
        }
        if !is_valid_topic_component(part) {
            return Err(TopicNameError::InvalidNamespace(format!(
                "invalid component '{}'",
                part
            )));
        }
    }
    Ok(())
}

fn validate_node_name(node_name: &str) -> Result<(), TopicNameError> {
    if node_name.is_empty() {
        return Err(TopicNameError::InvalidNodeName(
            "node name is empty".to_string(),
        ));
    }
    if !is_valid_topic_component(node_name) {
        return Err(TopicNameError::InvalidNodeName(format!(
            "invalid node name '{}'",
            node_name
        )));
    }
    Ok(())
}

fn validate_topic_body(topic: &str) -> Result<(), TopicNameError> {
    if topic.is_empty() {
        return Err(TopicNameError::Empty);
    }
    if topic.ends_with('/') {
        return Err(TopicNameError::EndsWithSlash);
    }
    for part in topic.split('/') {
        if part.is_empty() {
            continue;
        }
        if !is_valid_topic_component(part) {
            return Err(TopicNameError::InvalidCharacters(part.to_string()));
        }
    }
    Ok(())
}

/// Expand a topic name to its fully-qualified form.
///
/// - `/absolute` stays as is
/// - `~/private` expands under the node's namespace and name
/// - `relative` expands under the node's namespace
pub fn qualify_topic_name(
    topic: &str,
    namespace: &str,
    node_name: &str,
) -> Result<String, TopicNameError> {
    if topic.is_empty() {
        return Err(TopicNameError::Empty);
    }
    validate_namespace(namespace)?;
    validate_node_name(node_name)?;

    let ns = namespace.trim_end_matches('/');
    let ns = if ns.is_empty() || ns.starts_with('/') {
        ns.to_string()
    } else {
        format!("/{}", ns)
    };

    let qualified = if let Some(rest) = topic.strip_prefix("~") {
        let rest = rest.strip_prefix('/').unwrap_or(rest);
        if rest.is_empty() {
            format!("{}/{}", ns, node_name)
        } else {
            format!("{}/{}/{}", ns, node_name, rest)
        }
    } else if topic.starts_with('/') {
        topic.to_string()
    } else {
        format!("{}/{}", ns, topic)
    };

    validate_topic_body(&qualified)?;
    Ok(qualified)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_names_are_untouched() {
        assert_eq!(
            qualify_topic_name("/marker_test", "", "viz").unwrap(),
            "/marker_test"
        );
        assert_eq!(
            qualify_topic_name("/a/b/c", "/ns", "viz").unwrap(),
            "/a/b/c"
        );
    }

    #[test]
    fn relative_names_expand_under_namespace() {
        assert_eq!(
            qualify_topic_name("marker_test", "", "viz").unwrap(),
            "/marker_test"
        );
        assert_eq!(
            qualify_topic_name("marker_test", "/robot0", "viz").unwrap(),
            "/robot0/marker_test"
        );
        assert_eq!(
            qualify_topic_name("marker_test", "robot0", "viz").unwrap(),
            "/robot0/marker_test"
        );
    }

    #[test]
    fn private_names_expand_under_node() {
        assert_eq!(
            qualify_topic_name("~/markers", "/robot0", "viz").unwrap(),
            "/robot0/viz/markers"
        );
        assert_eq!(qualify_topic_name("~", "", "viz").unwrap(), "/viz");
    }

    #[test]
    fn invalid_names_are_rejected() {
        assert_eq!(
            qualify_topic_name("", "", "viz"),
            Err(TopicNameError::Empty)
        );
        assert_eq!(
            qualify_topic_name("marker/", "", "viz"),
            Err(TopicNameError::EndsWithSlash)
        );
        assert!(matches!(
            qualify_topic_name("bad topic", "", "viz"),
            Err(TopicNameError::InvalidCharacters(_))
        ));
        assert!(matches!(
            qualify_topic_name("ok", "", "bad name"),
            Err(TopicNameError::InvalidNodeName(_))
        ));
        assert!(matches!(
            qualify_topic_name("ok", "/1ns", "viz"),
            Err(TopicNameError::InvalidNamespace(_))
        ));
    }
}
