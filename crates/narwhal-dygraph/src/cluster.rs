use crate::color::Color;
use crate::error::{Error, Result};
use crate::evolution::Evolution;
use crate::graph::NodeIx;
use serde::{Deserialize, Serialize};

/// A pole node with the nodes grouped around it.
///
/// The cluster is identified by its pole's id. The pole is never one of its own members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    id: String,
    pole: NodeIx,
    members: Vec<NodeIx>,
    pub color: Evolution<Color>,
}

impl Cluster {
    pub fn new(id: impl Into<String>, pole: NodeIx) -> Self {
        Self {
            id: id.into(),
            pole,
            members: Vec::new(),
            color: Evolution::new(Color::GRAY),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn pole(&self) -> NodeIx {
        self.pole
    }

    pub fn members(&self) -> &[NodeIx] {
        &self.members
    }

    pub fn is_node_pole(&self, n: NodeIx) -> bool {
        self.pole == n
    }

    pub fn is_node_member(&self, n: NodeIx) -> bool {
        self.members.contains(&n)
    }

    pub fn add_member(&mut self, n: NodeIx) -> Result<()> {
        if n == self.pole {
            return Err(Error::PoleAsMember {
                pole: self.id.clone(),
            });
        }
        if !self.members.contains(&n) {
            self.members.push(n);
        }
        Ok(())
    }

    pub fn add_members(&mut self, members: impl IntoIterator<Item = NodeIx>) -> Result<()> {
        for n in members {
            self.add_member(n)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pole_is_never_a_member() {
        let pole = NodeIx::new(0);
        let mut c = Cluster::new("p", pole);
        c.add_members([NodeIx::new(1), NodeIx::new(2), NodeIx::new(1)])
            .unwrap();
        assert_eq!(c.members().len(), 2);
        assert!(c.is_node_pole(pole));
        assert!(!c.is_node_member(pole));
        assert_eq!(
            c.add_member(pole),
            Err(Error::PoleAsMember { pole: "p".into() })
        );
    }
}
