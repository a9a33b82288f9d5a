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

use crate::*;
use hand_pose_format::{
    AutoPoseSettings, DefaultPoseSetting, HandPose, HandPoseData, HandPoseSettings,
    HandSelector, MirrorRule, PoseLibrary, PoseStorage, Side, StoreKind, StoreLocator,
};
use tracing::{error, info, warn};

/// One posable hand: its rig, the listing of its joints and the rest pose it
/// had when it was attached.
pub struct Hand<R: Rig> {
    rig: R,
    info: HandInfo<R::Joint>,
    rest: RestPose<R::Joint>,
}

impl<R: Rig> Hand<R> {
    pub fn new(rig: R) -> Self {
        let info = HandInfo::build(&rig);
        let rest = RestPose::capture(&info, &rig);
        Self { rig, info, rest }
    }

    pub fn rig(&self) -> &R {
        &self.rig
    }

    pub fn rig_mut(&mut self) -> &mut R {
        &mut self.rig
    }

    pub fn info(&self) -> &HandInfo<R::Joint> {
        &self.info
    }

    pub fn info_mut(&mut self) -> &mut HandInfo<R::Joint> {
        &mut self.info
    }

    pub fn rest(&self) -> &RestPose<R::Joint> {
        &self.rest
    }

    /// Update the joint listing after the topology of the rig changed.
    pub fn rebuild_info(&mut self) {
        self.info.rebuild(&self.rig);
    }

    pub fn included_count(&self) -> usize {
        self.info.included_count()
    }

    pub fn fingers(&self) -> Vec<Finger<R::Joint>> {
        derive_fingers(&self.info)
    }

    pub fn capture(&self) -> HandPose {
        capture(&self.info, &self.rig)
    }

    pub fn apply(&mut self, pose: &HandPose) -> Result<(), PoseError> {
        apply(pose, &self.info, &mut self.rig)
    }
}

/// Runs the authoring operators on a pair of hands.
pub struct PoseController<R: Rig> {
    left: Hand<R>,
    right: Hand<R>,
    auto_pose: AutoPoseSettings,
    mirror: MirrorRule,
    default_pose: Option<HandPoseData>,
    sweeps: Vec<(Side, AutoPoseSweep<R::Joint>)>,
}

impl<R: Rig> PoseController<R> {
    /// Take control of both hands, remembering their current pose as the
    /// rest pose.
    pub fn attach(left: R, right: R, settings: &HandPoseSettings) -> Self {
        Self {
            left: Hand::new(left),
            right: Hand::new(right),
            auto_pose: settings.auto_pose.clone(),
            mirror: settings.mirror,
            default_pose: None,
            sweeps: Vec::new(),
        }
    }

    pub fn hand(&self, side: Side) -> &Hand<R> {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn hand_mut(&mut self, side: Side) -> &mut Hand<R> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Give back both rigs, dropping any running sweep.
    pub fn detach(self) -> (R, R) {
        (self.left.rig, self.right.rig)
    }

    fn source_and_target(&mut self, source: Side) -> (&Hand<R>, &mut Hand<R>) {
        match source {
            Side::Left => (&self.left, &mut self.right),
            Side::Right => (&self.right, &mut self.left),
        }
    }

    pub fn auto_pose_settings(&self) -> &AutoPoseSettings {
        &self.auto_pose
    }

    pub fn set_auto_pose_settings(&mut self, settings: AutoPoseSettings) {
        self.auto_pose = settings;
    }

    pub fn mirror_rule(&self) -> &MirrorRule {
        &self.mirror
    }

    pub fn set_mirror_rule(&mut self, rule: MirrorRule) {
        self.mirror = rule;
    }

    pub fn default_pose(&self) -> Option<&HandPoseData> {
        self.default_pose.as_ref()
    }

    pub fn set_default_pose(&mut self, data: Option<HandPoseData>) {
        self.default_pose = data;
    }

    pub fn is_default_pose_configured(&self) -> bool {
        self.default_pose.is_some()
    }

    /// Resolve the configured default pose file. A collection uses the record
    /// at the configured index, or its first record if the index is out of
    /// range. An empty collection leaves no default pose.
    pub fn load_default_pose<S: PoseStorage>(
        &mut self,
        library: &PoseLibrary<S>,
        setting: Option<&DefaultPoseSetting>,
    ) -> Result<(), PoseError> {
        let Some(setting) = setting else {
            self.default_pose = None;
            return Ok(());
        };

        let file = library.open(&setting.locator)?;
        self.default_pose = match file.store.kind() {
            StoreKind::Single => Some(file.store.load()?),
            StoreKind::Collection => {
                if setting.index >= file.store.len() && !file.store.is_empty() {
                    warn!(
                        "Default pose index {} is out of range for {}, using its first pose",
                        setting.index, setting.locator
                    );
                }
                file.store
                    .get(setting.index)
                    .or_else(|| file.store.first())
                    .cloned()
            }
        };
        Ok(())
    }

    /// Record the state of the selected hands.
    pub fn checkpoint(&self, label: &str, selector: HandSelector) -> UndoCheckpoint<R::Joint> {
        let mut checkpoint = UndoCheckpoint::new(label);
        for side in selector.sides() {
            let hand = self.hand(side);
            checkpoint.attachments.push((side, hand.rig.attachment()));
            checkpoint.rotations.extend(
                hand.info
                    .joints()
                    .map(|joint| (side, joint, hand.rig.local_rotation(joint))),
            );
        }
        checkpoint
    }

    pub fn restore_checkpoint(&mut self, checkpoint: &UndoCheckpoint<R::Joint>) {
        for (side, attachment) in &checkpoint.attachments {
            self.hand_mut(*side).rig.set_attachment(*attachment);
        }
        for (side, joint, rotation) in &checkpoint.rotations {
            self.hand_mut(*side).rig.set_local_rotation(*joint, *rotation);
        }
    }

    pub fn can_clear(&self, selector: HandSelector) -> bool {
        !selector.is_none()
    }

    /// Reset the selected hands to the default pose, or to the rest pose when
    /// no default pose is configured.
    pub fn clear_or_default<U: UndoRecorder<R::Joint>>(
        &mut self,
        selector: HandSelector,
        undo: &mut U,
    ) -> Result<(), PoseError> {
        if selector.is_none() {
            return Ok(());
        }

        match self.default_pose.take() {
            Some(data) => {
                let result = self.apply_data(&data, selector, "Clear or default hands", undo);
                self.default_pose = Some(data);
                result.inspect_err(|err| error!("Unable to apply the default pose: {err}"))
            }
            None => {
                undo.record(self.checkpoint("Clear or default hands", selector));
                for side in selector.sides() {
                    let hand = self.hand_mut(side);
                    hand.rest.restore(&mut hand.rig);
                }
                Ok(())
            }
        }
    }

    pub fn can_mirror<S: HandSelection + ?Sized>(&self, selection: &S) -> bool {
        selection.selected_hands().single().is_some()
    }

    /// Mirror the one selected hand onto the other hand. Returns the side
    /// that was written.
    pub fn mirror<S, U>(&mut self, selection: &S, undo: &mut U) -> Result<Side, PoseError>
    where
        S: HandSelection + ?Sized,
        U: UndoRecorder<R::Joint>,
    {
        let selector = selection.selected_hands();
        let source = selector.single().ok_or(PoseError::AmbiguousSelection {
            operation: "mirror",
            selection: selector,
        })?;
        let target = source.opposite();
        check_mirror_layout(&self.left.info, &self.right.info)
            .inspect_err(|err| error!("Unable to mirror the {source} hand: {err}"))?;

        undo.record(self.checkpoint("Mirror hand", target.into()));
        let rule = self.mirror;
        let (from, to) = self.source_and_target(source);
        let written = mirror_hand(&rule, &from.info, &from.rig, &to.info, &mut to.rig)?;
        info!("Mirrored the {source} hand onto the {target} hand ({written} joints)");
        Ok(target)
    }

    pub fn can_auto_pose<S: HandSelection + ?Sized>(&self, selection: &S) -> bool {
        !selection.selected_hands().is_none()
    }

    /// Start curling the fingers of the selected hands around `target`.
    /// Progress is made by calling [`Self::tick_auto_pose`].
    pub fn auto_pose<S, P>(
        &mut self,
        selection: &S,
        target: &P::Target,
        physics: &mut P,
    ) -> Result<HandSelector, PoseError>
    where
        S: HandSelection + ?Sized,
        P: PhysicsHost<R::Joint>,
    {
        let selector = selection.selected_hands();
        if selector.is_none() {
            return Err(PoseError::AmbiguousSelection {
                operation: "auto pose",
                selection: selector,
            });
        }
        prepare_target::<R::Joint, P>(physics, target)
            .inspect_err(|err| error!("Unable to start auto pose: {err}"))?;

        for side in selector.sides() {
            self.sweeps.retain(|(s, _)| *s != side);
            let hand = self.hand(side);
            let fingers = hand.fingers();
            if fingers.is_empty() {
                warn!("The {side} hand has no fingers to auto pose, include more joints");
            }
            let segments = finger_segments(&hand.rig, &fingers, &self.auto_pose);
            for segment in segments.iter().flatten() {
                physics.attach_segment_capsule(segment.joint, segment.capsule);
                physics.set_collider_enabled(segment.joint, true);
            }
            let sweep = AutoPoseSweep::from_segments(&segments, &self.auto_pose);
            info!(
                "Started auto pose of the {side} hand with {} fingers",
                fingers.len()
            );
            self.sweeps.push((side, sweep));
        }
        Ok(selector)
    }

    pub fn running_sweeps(&self) -> HandSelector {
        self.sweeps
            .iter()
            .fold(HandSelector::None, |selector, (side, _)| selector.with(*side))
    }

    pub fn is_auto_pose_running(&self, side: Side) -> bool {
        self.sweeps.iter().any(|(s, _)| *s == side)
    }

    pub fn sweep(&self, side: Side) -> Option<&AutoPoseSweep<R::Joint>> {
        self.sweeps
            .iter()
            .find(|(s, _)| *s == side)
            .map(|(_, sweep)| sweep)
    }

    /// Advance every running sweep by one step, then let the physics host
    /// evaluate contacts. Returns true while any sweep is still running.
    pub fn tick_auto_pose<P, U>(&mut self, physics: &mut P, undo: &mut U) -> bool
    where
        P: PhysicsHost<R::Joint>,
        U: UndoRecorder<R::Joint>,
    {
        if self.sweeps.is_empty() {
            return false;
        }

        undo.record(self.checkpoint("Auto pose", self.running_sweeps()));
        for (side, sweep) in &mut self.sweeps {
            let hand = match side {
                Side::Left => &mut self.left,
                Side::Right => &mut self.right,
            };
            if sweep.tick(&mut hand.rig, physics) == SweepStatus::Finished {
                info!(
                    "Auto pose of the {side} hand finished after {} iterations",
                    sweep.iterations()
                );
            }
        }
        self.sweeps.retain(|(_, sweep)| !sweep.is_finished());
        physics.simulate();
        !self.sweeps.is_empty()
    }

    /// Stop the sweeps of the selected hands. Joints stay where they are.
    pub fn cancel_auto_pose(&mut self, selector: HandSelector) -> usize {
        let before = self.sweeps.len();
        self.sweeps.retain(|(side, _)| !selector.includes(*side));
        before - self.sweeps.len()
    }

    /// Re-enable the segment colliders of the selected hands.
    pub fn restore_colliders<C: SegmentColliders<R::Joint>>(
        &self,
        selector: HandSelector,
        colliders: &mut C,
    ) {
        for side in selector.sides() {
            let hand = self.hand(side);
            let segments = finger_segments(&hand.rig, &hand.fingers(), &self.auto_pose);
            for segment in segments.iter().flatten() {
                colliders.set_collider_enabled(segment.joint, true);
            }
        }
    }

    pub fn capture_data(&self, name: &str) -> HandPoseData {
        HandPoseData::new(name, self.left.capture(), self.right.capture())
    }

    pub fn can_load(&self, data: &HandPoseData) -> bool {
        data.fits(self.left.included_count(), self.right.included_count())
    }

    /// Apply stored data to the selected hands. Nothing is changed unless
    /// every selected hand fits.
    pub fn apply_data<U: UndoRecorder<R::Joint>>(
        &mut self,
        data: &HandPoseData,
        selector: HandSelector,
        label: &str,
        undo: &mut U,
    ) -> Result<(), PoseError> {
        for side in selector.sides() {
            let expected = self.hand(side).included_count();
            let pose = data.hand(side);
            if !pose.fits(expected) {
                return Err(PoseError::PoseMismatch {
                    expected,
                    found: pose.len(),
                });
            }
        }

        undo.record(self.checkpoint(label, selector));
        for side in selector.sides() {
            self.hand_mut(side).apply(data.hand(side))?;
        }
        Ok(())
    }

    /// Load a pose from a file into both hands. A collection needs the name
    /// of one of its records, or uses its first record when none is given.
    pub fn load_pose<S, U>(
        &mut self,
        library: &PoseLibrary<S>,
        locator: &StoreLocator,
        pose_name: Option<&str>,
        undo: &mut U,
    ) -> Result<HandPoseData, PoseError>
    where
        S: PoseStorage,
        U: UndoRecorder<R::Joint>,
    {
        let file = library.open(locator)?;
        let data = match file.store.kind() {
            StoreKind::Single => file.store.load()?,
            StoreKind::Collection => {
                let name = match pose_name.filter(|name| !name.is_empty()) {
                    Some(name) => name.to_owned(),
                    None => file
                        .store
                        .first()
                        .map(|data| data.name.clone())
                        .ok_or_else(|| PoseError::MissingRecord(String::new()))?,
                };
                if !file.store.contains(&name) {
                    return Err(PoseError::MissingRecord(name));
                }
                file.store.load_named(&name)?
            }
        };

        self.apply_data(&data, HandSelector::Both, "Load pose", undo)
            .inspect_err(|err| error!("Unable to load pose from {locator}: {err}"))?;
        info!("Loaded pose [{}] from {locator}", data.name);
        Ok(data)
    }

    pub fn create_pose<S: PoseStorage>(
        &self,
        library: &mut PoseLibrary<S>,
        file_name: &str,
        template: &str,
        pose_name: Option<&str>,
    ) -> Result<StoreLocator, PoseError> {
        Ok(library.create(file_name, template, pose_name, self.capture_data(""))?)
    }

    pub fn overwrite_pose<S: PoseStorage>(
        &self,
        library: &mut PoseLibrary<S>,
        file_name: &str,
        pose_name: Option<&str>,
    ) -> Result<StoreLocator, PoseError> {
        Ok(library.overwrite(file_name, pose_name, self.capture_data(""))?)
    }

    pub fn add_pose<S: PoseStorage>(
        &self,
        library: &mut PoseLibrary<S>,
        file_name: &str,
        pose_name: &str,
    ) -> Result<StoreLocator, PoseError> {
        Ok(library.add(file_name, pose_name, self.capture_data(""))?)
    }

    pub fn replace_pose<S: PoseStorage>(
        &self,
        library: &mut PoseLibrary<S>,
        file_name: &str,
        pose_name: &str,
    ) -> Result<StoreLocator, PoseError> {
        Ok(library.replace(file_name, pose_name, self.capture_data(""))?)
    }
}
