//! Mold catalogue
//!
//! Molds are footprint templates keyed by a stable identifier. The catalogue
//! keeps insertion order, since fitting is first-fit.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, SettlementError};

/// Stable mold identifier
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MoldId(pub String);

impl From<&str> for MoldId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for MoldId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for MoldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a mold is used for
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoldKind {
    /// Fills a parcel
    Building,
    /// Wall run with an opening
    Gate,
    /// Sits at each wall corner
    Tower,
    /// Plain wall run
    Wall,
    /// Wall run next to a gate
    Ramp,
}

/// A footprint template
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Mold {
    pub id: MoldId,

    /// Extent along the facing edge (buildings) or along the wall run
    pub width: f32,

    /// Extent perpendicular to `width`
    pub depth: f32,

    pub kind: MoldKind,
}

impl Mold {
    pub fn new(id: impl Into<MoldId>, width: f32, depth: f32, kind: MoldKind) -> Self {
        Self {
            id: id.into(),
            width,
            depth,
            kind,
        }
    }

    /// Whether the footprint fits inside the given spans
    #[inline]
    pub fn fits(&self, width_span: f32, depth_span: f32) -> bool {
        self.width <= width_span && self.depth <= depth_span
    }
}

/// Ordered set of molds with unique identifiers
///
/// # Example
///
/// ```
/// use voronoi_settlement::*;
///
/// let mut catalogue = MoldCatalogue::from_molds([
///     Mold::new("hall", 12.0, 10.0, MoldKind::Building),
///     Mold::new("hut", 4.0, 4.0, MoldKind::Building),
///     Mold::new("gate", 6.0, 3.0, MoldKind::Gate),
/// ])
/// .unwrap();
///
/// assert_eq!(catalogue.len(), 3);
/// assert!(catalogue.insert(Mold::new("hut", 1.0, 1.0, MoldKind::Building)).is_err());
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoldCatalogue {
    molds: Vec<Mold>,
}

impl MoldCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalogue, keeping the given order
    ///
    /// # Errors
    ///
    /// Returns `DuplicateMold` on the first repeated identifier
    pub fn from_molds(molds: impl IntoIterator<Item = Mold>) -> Result<Self> {
        let mut catalogue = Self::new();
        for mold in molds {
            catalogue.insert(mold)?;
        }
        Ok(catalogue)
    }

    /// Append a mold
    ///
    /// # Errors
    ///
    /// Returns `DuplicateMold` if the identifier is already present
    pub fn insert(&mut self, mold: Mold) -> Result<()> {
        if self.get(&mold.id).is_some() {
            return Err(SettlementError::DuplicateMold(mold.id.0));
        }
        self.molds.push(mold);
        Ok(())
    }

    pub fn get(&self, id: &MoldId) -> Option<&Mold> {
        self.molds.iter().find(|m| &m.id == id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.molds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.molds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mold> {
        self.molds.iter()
    }

    /// Molds of one kind, in catalogue order
    pub fn of_kind(&self, kind: MoldKind) -> impl Iterator<Item = &Mold> {
        self.molds.iter().filter(move |m| m.kind == kind)
    }

    /// First mold of `kind` whose footprint fits the spans
    pub fn first_fit(&self, kind: MoldKind, width_span: f32, depth_span: f32) -> Option<&Mold> {
        self.of_kind(kind).find(|m| m.fits(width_span, depth_span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalogue() -> MoldCatalogue {
        MoldCatalogue::from_molds([
            Mold::new("manor", 14.0, 12.0, MoldKind::Building),
            Mold::new("gate", 8.0, 4.0, MoldKind::Gate),
            Mold::new("house", 6.0, 5.0, MoldKind::Building),
            Mold::new("shed", 3.0, 2.0, MoldKind::Building),
        ])
        .unwrap()
    }

    #[test]
    fn test_first_fit_keeps_order() {
        let catalogue = catalogue();
        assert_eq!(
            catalogue.first_fit(MoldKind::Building, 20.0, 20.0).unwrap().id,
            MoldId::from("manor")
        );
        assert_eq!(
            catalogue.first_fit(MoldKind::Building, 7.0, 20.0).unwrap().id,
            MoldId::from("house")
        );
        assert_eq!(
            catalogue.first_fit(MoldKind::Building, 7.0, 4.0).unwrap().id,
            MoldId::from("shed")
        );
        assert!(catalogue.first_fit(MoldKind::Building, 2.0, 2.0).is_none());
        assert!(catalogue.first_fit(MoldKind::Tower, 100.0, 100.0).is_none());
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut catalogue = catalogue();
        let err = catalogue
            .insert(Mold::new("house", 1.0, 1.0, MoldKind::Building))
            .unwrap_err();
        assert_eq!(err, SettlementError::DuplicateMold("house".into()));
        assert_eq!(catalogue.len(), 4);
    }

    #[test]
    fn test_lookup() {
        let catalogue = catalogue();
        assert_eq!(catalogue.get(&"gate".into()).unwrap().kind, MoldKind::Gate);
        assert!(catalogue.get(&"keep".into()).is_none());
        assert_eq!(catalogue.of_kind(MoldKind::Building).count(), 3);
        assert_eq!(MoldId::from("shed").to_string(), "shed");
    }
}
