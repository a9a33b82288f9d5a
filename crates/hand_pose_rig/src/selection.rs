/*
 * Copyright (C) 2026 Open Source Robotics Foundation
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 *
*/

use hand_pose_format::{HandSelector, Side};

/// Reports which hands the designer currently has selected.
pub trait HandSelection {
    fn selected_hands(&self) -> HandSelector;
}

impl HandSelection for HandSelector {
    fn selected_hands(&self) -> HandSelector {
        *self
    }
}

/// The handles under which the embedding application registered each hand,
/// e.g. scene entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandHandles<H> {
    pub left: H,
    pub right: H,
}

impl<H: PartialEq> HandHandles<H> {
    pub fn new(left: H, right: H) -> Self {
        Self { left, right }
    }

    pub fn get(&self, side: Side) -> &H {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn side_of(&self, handle: &H) -> Option<Side> {
        Side::BOTH
            .into_iter()
            .find(|side| self.get(*side) == handle)
    }

    /// Resolve a set of selected objects into the hands it contains.
    /// Objects that are not a registered hand are ignored.
    pub fn resolve<'a>(&self, selected: impl IntoIterator<Item = &'a H>) -> HandSelector
    where
        H: 'a,
    {
        selected
            .into_iter()
            .filter_map(|handle| self.side_of(handle))
            .fold(HandSelector::None, HandSelector::with)
    }

    pub fn selection<'a>(&'a self, selected: &'a [H]) -> SelectedObjects<'a, H> {
        SelectedObjects {
            handles: self,
            selected,
        }
    }
}

/// A host selection set viewed through the registered hand handles.
#[derive(Debug, Clone, Copy)]
pub struct SelectedObjects<'a, H> {
    handles: &'a HandHandles<H>,
    selected: &'a [H],
}

impl<H: PartialEq> HandSelection for SelectedObjects<'_, H> {
    fn selected_hands(&self) -> HandSelector {
        self.handles.resolve(self.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_registered_handles() {
        let handles = HandHandles::new(10_u64, 11_u64);
        assert_eq!(handles.resolve(&[]), HandSelector::None);
        assert_eq!(handles.resolve(&[3, 10]), HandSelector::Left);
        assert_eq!(handles.resolve(&[11]), HandSelector::Right);
        assert_eq!(handles.resolve(&[11, 10, 11]), HandSelector::Both);
        assert_eq!(
            handles.selection(&[7, 11]).selected_hands(),
            HandSelector::Right
        );
        assert_eq!(handles.side_of(&12), None);
    }
}
