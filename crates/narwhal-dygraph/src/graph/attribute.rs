use super::NodeIx;

/// Per-node values with a shared default for nodes that were never set.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeAttribute<V> {
    default: V,
    values: Vec<V>,
}

impl<V: Default + Clone> Default for NodeAttribute<V> {
    fn default() -> Self {
        Self::new(V::default())
    }
}

impl<V: Clone> NodeAttribute<V> {
    pub fn new(default: V) -> Self {
        Self {
            default,
            values: Vec::new(),
        }
    }

    pub fn with_len(default: V, len: usize) -> Self {
        Self {
            values: vec![default.clone(); len],
            default,
        }
    }

    pub fn default_value(&self) -> &V {
        &self.default
    }

    pub fn get(&self, n: NodeIx) -> &V {
        self.values.get(n.index()).unwrap_or(&self.default)
    }

    pub fn get_mut(&mut self, n: NodeIx) -> &mut V {
        if n.index() >= self.values.len() {
            self.values.resize(n.index() + 1, self.default.clone());
        }
        &mut self.values[n.index()]
    }

    pub fn set(&mut self, n: NodeIx, value: V) {
        *self.get_mut(n) = value;
    }

    /// Number of explicitly stored slots.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeIx, &V)> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, v)| (NodeIx::new(i), v))
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.values.iter_mut()
    }
}
