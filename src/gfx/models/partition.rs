//! Object partition table: which slice of the shared index buffer belongs to whom

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, SceneError};
use crate::gfx::geometry::IndexRange;

/// Every named object or sub-part recorded while building the scene.
///
/// `Monitor` and `Mouse` are aggregate ranges that cover their sub-parts;
/// only the leaf parts are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObjectId {
    Table,
    Monitor,
    MonitorStand,
    MonitorScreen,
    ScreenPanel,
    Mouse,
    MouseBase,
    MouseBody,
    MousePalm,
    MouseLeftButton,
    MouseRightButton,
    MouseWheel,
}

impl ObjectId {
    pub const DRAWABLES: [ObjectId; 10] = [
        ObjectId::Table,
        ObjectId::MonitorStand,
        ObjectId::MonitorScreen,
        ObjectId::ScreenPanel,
        ObjectId::MouseBase,
        ObjectId::MouseBody,
        ObjectId::MousePalm,
        ObjectId::MouseLeftButton,
        ObjectId::MouseRightButton,
        ObjectId::MouseWheel,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ObjectId::Table => "table",
            ObjectId::Monitor => "monitor",
            ObjectId::MonitorStand => "monitor_stand",
            ObjectId::MonitorScreen => "monitor_screen",
            ObjectId::ScreenPanel => "screen_panel",
            ObjectId::Mouse => "mouse",
            ObjectId::MouseBase => "mouse_base",
            ObjectId::MouseBody => "mouse_body",
            ObjectId::MousePalm => "mouse_palm",
            ObjectId::MouseLeftButton => "mouse_left_button",
            ObjectId::MouseRightButton => "mouse_right_button",
            ObjectId::MouseWheel => "mouse_wheel",
        }
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, ObjectId::Monitor | ObjectId::Mouse)
    }

    /// Only the screen panel samples the screen texture
    pub fn is_textured(&self) -> bool {
        matches!(self, ObjectId::ScreenPanel)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mapping from object to its `(start, count)` index range.
///
/// Filled once during scene construction and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartitionTable {
    ranges: BTreeMap<ObjectId, IndexRange>,
}

impl PartitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ObjectId, range: IndexRange) {
        self.ranges.insert(id, range);
    }

    pub fn get(&self, id: ObjectId) -> Option<IndexRange> {
        self.ranges.get(&id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, IndexRange)> + '_ {
        self.ranges.iter().map(|(id, range)| (*id, *range))
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Checks every range against the final index buffer length
    pub fn validate(&self, index_len: usize) -> Result<()> {
        for range in self.ranges.values() {
            if !range.fits(index_len) {
                return Err(SceneError::InvalidRange {
                    start: range.start,
                    end: range.end(),
                    len: index_len,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_overflowing_range() {
        let mut table = PartitionTable::new();
        table.insert(ObjectId::Table, IndexRange::new(0, 36));
        assert!(table.validate(36).is_ok());

        table.insert(ObjectId::MouseWheel, IndexRange::new(30, 12));
        match table.validate(36) {
            Err(SceneError::InvalidRange { start, end, len }) => {
                assert_eq!((start, end, len), (30, 42, 36));
            }
            other => panic!("expected InvalidRange, got {:?}", other),
        }
    }

    #[test]
    fn test_drawables_exclude_aggregates() {
        assert!(ObjectId::DRAWABLES.iter().all(|id| !id.is_aggregate()));
        assert_eq!(ObjectId::MouseWheel.to_string(), "mouse_wheel");
    }
}
