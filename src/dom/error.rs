use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    UnknownNode(usize),
    NotAContainer(usize),
    NotAChild { parent: usize, child: usize },
    Cycle { node: usize },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::UnknownNode(id) => write!(f, "node #{id} does not exist"),
            TreeError::NotAContainer(id) => write!(f, "node #{id} cannot hold children"),
            TreeError::NotAChild { parent, child } => {
                write!(f, "node #{child} is not a child of #{parent}")
            }
            TreeError::Cycle { node } => {
                write!(f, "linking node #{node} would create a cycle")
            }
        }
    }
}

impl std::error::Error for TreeError {}
