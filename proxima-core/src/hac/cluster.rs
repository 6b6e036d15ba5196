//! Cluster membership bookkeeping.

/// Members of one live cluster, stored as interned node indices.
///
/// The first member of the pivot cluster is always the first pivot node,
/// and pivot members stay ahead of acquired nodes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Cluster {
    members: Vec<usize>,
}

impl Cluster {
    pub(crate) fn singleton(node: usize) -> Self {
        Self {
            members: vec![node],
        }
    }

    pub(crate) fn from_members(members: Vec<usize>) -> Self {
        Self { members }
    }

    #[rustfmt::skip]
    pub(crate) fn len(&self) -> usize { self.members.len() }

    #[rustfmt::skip]
    pub(crate) fn members(&self) -> &[usize] { &self.members }

    /// Joins `other` into `self`.
    ///
    /// With `keep_order` the existing members stay in front, which is how
    /// the pivot cluster records acquisitions. Otherwise the larger side
    /// leads and `self` wins ties.
    pub(crate) fn absorb(&mut self, mut other: Self, keep_order: bool) {
        if !keep_order && other.len() > self.len() {
            std::mem::swap(&mut self.members, &mut other.members);
        }
        self.members.extend(other.members);
    }
}
