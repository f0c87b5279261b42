//! Breed descriptors: which sheet frame fills which body-part slot for each
//! age stage and sex.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Life stage of a creature. Numeric values match the genome encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeStage {
    Baby = 0,
    Child = 1,
    Adolescent = 2,
    Youth = 3,
    Adult = 4,
    Old = 5,
    Senile = 6,
}

impl AgeStage {
    /// All stages, youngest first.
    pub const ALL: [AgeStage; 7] = [
        AgeStage::Baby,
        AgeStage::Child,
        AgeStage::Adolescent,
        AgeStage::Youth,
        AgeStage::Adult,
        AgeStage::Old,
        AgeStage::Senile,
    ];

    /// Decode the genome byte value.
    pub fn from_u8(value: u8) -> Option<AgeStage> {
        Self::ALL.get(value as usize).copied()
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            AgeStage::Baby => "baby",
            AgeStage::Child => "child",
            AgeStage::Adolescent => "adolescent",
            AgeStage::Youth => "youth",
            AgeStage::Adult => "adult",
            AgeStage::Old => "old",
            AgeStage::Senile => "senile",
        }
    }
}

impl fmt::Display for AgeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AgeStage {
    type Err = String;

    /// Accepts the stage number (`0`..=`6`) or its name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if let Ok(n) = lower.parse::<u8>() {
            return AgeStage::from_u8(n)
                .ok_or_else(|| format!("Age must be an integer value 0..6 (inclusive); Found: {}", s));
        }
        AgeStage::ALL
            .iter()
            .copied()
            .find(|stage| stage.name() == lower)
            .ok_or_else(|| format!("Unknown age stage '{}'", s))
    }
}

/// Creature sex. Numeric values match the genome encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male = 0,
    Female = 1,
}

impl Sex {
    pub fn from_u8(value: u8) -> Option<Sex> {
        match value {
            0 => Some(Sex::Male),
            1 => Some(Sex::Female),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "male" | "mal" => Ok(Sex::Male),
            "f" | "female" | "fem" => Ok(Sex::Female),
            _ => Err(format!("Invalid sex; Expected [m]ale or [f]emale; Found: {}", s)),
        }
    }
}

/// An (age stage, sex) pair selecting one part mapping.
pub type VariantKey = (AgeStage, Sex);

/// Where one body-part slot is drawn from and where it lands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartTarget {
    /// Resource block name of the sprite sheet
    pub sheet: String,
    /// 0-based frame within the sheet
    pub frame: u16,
    pub anchor_x: i16,
    pub anchor_y: i16,
    /// Draw order; lower values are drawn first
    pub z: i16,
}

/// Tint, swap and rotation applied to a resolved palette.
///
/// Every field is centred on 128, which leaves colors unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorTransform {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub swap: u8,
    pub rotation: u8,
}

impl ColorTransform {
    pub const NEUTRAL: u8 = 128;

    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }
}

impl Default for ColorTransform {
    fn default() -> Self {
        Self {
            red: Self::NEUTRAL,
            green: Self::NEUTRAL,
            blue: Self::NEUTRAL,
            swap: Self::NEUTRAL,
            rotation: Self::NEUTRAL,
        }
    }
}

/// Per-field overrides layered on top of a genome color transform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorOverrides {
    pub red: Option<u8>,
    pub green: Option<u8>,
    pub blue: Option<u8>,
    pub swap: Option<u8>,
    pub rotation: Option<u8>,
}

impl ColorOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Replace the fields of `base` that have an override.
    pub fn apply_to(&self, base: ColorTransform) -> ColorTransform {
        ColorTransform {
            red: self.red.unwrap_or(base.red),
            green: self.green.unwrap_or(base.green),
            blue: self.blue.unwrap_or(base.blue),
            swap: self.swap.unwrap_or(base.swap),
            rotation: self.rotation.unwrap_or(base.rotation),
        }
    }
}

/// The complete part mapping recovered from one genome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreedDescriptor {
    parts: BTreeMap<VariantKey, BTreeMap<String, PartTarget>>,
    claims: BTreeSet<VariantKey>,
    colors: BTreeMap<VariantKey, ColorTransform>,
}

impl BreedDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a slot to a target, replacing any earlier mapping for the same
    /// (age, sex, slot).
    pub fn insert_part(&mut self, age: AgeStage, sex: Sex, slot: impl Into<String>, target: PartTarget) {
        self.parts.entry((age, sex)).or_default().insert(slot.into(), target);
    }

    /// Record that the genome declares it defines `(age, sex)`.
    pub fn claim(&mut self, age: AgeStage, sex: Sex) {
        self.claims.insert((age, sex));
    }

    /// Mutable access to a variant's color transform, created neutral.
    pub fn color_transform_mut(&mut self, age: AgeStage, sex: Sex) -> &mut ColorTransform {
        self.colors.entry((age, sex)).or_default()
    }

    /// Slot mapping for one variant, if any parts are defined.
    pub fn parts(&self, age: AgeStage, sex: Sex) -> Option<&BTreeMap<String, PartTarget>> {
        self.parts.get(&(age, sex)).filter(|p| !p.is_empty())
    }

    /// Target for one slot.
    pub fn part(&self, age: AgeStage, sex: Sex, slot: &str) -> Option<&PartTarget> {
        self.parts.get(&(age, sex)).and_then(|p| p.get(slot))
    }

    /// Variants with at least one part, in (age, sex) order.
    pub fn variants(&self) -> impl Iterator<Item = VariantKey> + '_ {
        self.parts.iter().filter(|(_, p)| !p.is_empty()).map(|(k, _)| *k)
    }

    /// Variants declared in the genome header.
    pub fn claims(&self) -> impl Iterator<Item = VariantKey> + '_ {
        self.claims.iter().copied()
    }

    /// Color transform for a variant; neutral when the genome sets none.
    pub fn color_transform(&self, age: AgeStage, sex: Sex) -> ColorTransform {
        self.colors.get(&(age, sex)).copied().unwrap_or_default()
    }

    /// Slots in draw order: ascending z, ties broken by slot name.
    pub fn draw_order(&self, age: AgeStage, sex: Sex) -> Vec<(&str, &PartTarget)> {
        let mut slots: Vec<(&str, &PartTarget)> = self
            .parts
            .get(&(age, sex))
            .map(|p| p.iter().map(|(name, target)| (name.as_str(), target)).collect())
            .unwrap_or_default();
        slots.sort_by(|a, b| a.1.z.cmp(&b.1.z).then_with(|| a.0.cmp(b.0)));
        slots
    }

    /// Nearest age stage with parts for `sex`: `age` itself, else the closest
    /// younger stage, else the closest older one.
    pub fn nearest_age(&self, age: AgeStage, sex: Sex) -> Option<AgeStage> {
        if self.parts(age, sex).is_some() {
            return Some(age);
        }
        let younger = AgeStage::ALL.iter().rev().filter(|a| **a < age);
        let older = AgeStage::ALL.iter().filter(|a| **a > age);
        younger.chain(older).copied().find(|a| self.parts(*a, sex).is_some())
    }

    /// Take `slot` from `donor` for every variant this breed defines.
    ///
    /// Each variant gets the donor's mapping at the donor's nearest age for
    /// the same sex. Variants the donor cannot supply keep their own slot.
    /// Returns the number of variants changed.
    pub fn graft_slot(&mut self, slot: &str, donor: &BreedDescriptor) -> usize {
        let mut grafted = 0;
        for (&(age, sex), parts) in self.parts.iter_mut().filter(|(_, p)| !p.is_empty()) {
            let found = donor.nearest_age(age, sex).and_then(|donor_age| donor.part(donor_age, sex, slot));
            if let Some(target) = found {
                parts.insert(slot.to_string(), target.clone());
                grafted += 1;
            }
        }
        grafted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(sheet: &str, z: i16) -> PartTarget {
        PartTarget { sheet: sheet.to_string(), frame: 0, anchor_x: 0, anchor_y: 0, z }
    }

    #[test]
    fn test_age_stage_parse() {
        assert_eq!("4".parse::<AgeStage>(), Ok(AgeStage::Adult));
        assert_eq!("Adult".parse::<AgeStage>(), Ok(AgeStage::Adult));
        assert!("7".parse::<AgeStage>().is_err());
        assert!("ancient".parse::<AgeStage>().is_err());
    }

    #[test]
    fn test_sex_parse() {
        assert_eq!("F".parse::<Sex>(), Ok(Sex::Female));
        assert_eq!("male".parse::<Sex>(), Ok(Sex::Male));
        assert!("x".parse::<Sex>().is_err());
    }

    #[test]
    fn test_insert_part_replaces() {
        let mut desc = BreedDescriptor::new();
        desc.insert_part(AgeStage::Adult, Sex::Male, "body", target("a", 0));
        desc.insert_part(AgeStage::Adult, Sex::Male, "body", target("b", 0));
        assert_eq!(desc.part(AgeStage::Adult, Sex::Male, "body").unwrap().sheet, "b");
        assert_eq!(desc.parts(AgeStage::Adult, Sex::Male).unwrap().len(), 1);
    }

    #[test]
    fn test_draw_order_z_then_name() {
        let mut desc = BreedDescriptor::new();
        desc.insert_part(AgeStage::Adult, Sex::Female, "tail", target("t", 2));
        desc.insert_part(AgeStage::Adult, Sex::Female, "head", target("h", 1));
        desc.insert_part(AgeStage::Adult, Sex::Female, "body", target("b", 1));
        desc.insert_part(AgeStage::Adult, Sex::Female, "legs", target("l", -1));

        let order: Vec<&str> =
            desc.draw_order(AgeStage::Adult, Sex::Female).into_iter().map(|(n, _)| n).collect();
        assert_eq!(order, vec!["legs", "body", "head", "tail"]);
    }

    #[test]
    fn test_nearest_age_prefers_younger() {
        let mut desc = BreedDescriptor::new();
        desc.insert_part(AgeStage::Child, Sex::Male, "head", target("h", 0));
        desc.insert_part(AgeStage::Old, Sex::Male, "head", target("h", 0));

        assert_eq!(desc.nearest_age(AgeStage::Adult, Sex::Male), Some(AgeStage::Child));
        assert_eq!(desc.nearest_age(AgeStage::Baby, Sex::Male), Some(AgeStage::Child));
        assert_eq!(desc.nearest_age(AgeStage::Old, Sex::Male), Some(AgeStage::Old));
        assert_eq!(desc.nearest_age(AgeStage::Adult, Sex::Female), None);
    }

    #[test]
    fn test_graft_slot_uses_donor_nearest_age() {
        let mut desc = BreedDescriptor::new();
        desc.insert_part(AgeStage::Adult, Sex::Male, "head", target("own-head", 1));
        desc.insert_part(AgeStage::Adult, Sex::Male, "body", target("own-body", 0));
        desc.insert_part(AgeStage::Child, Sex::Female, "head", target("own-child", 1));

        let mut donor = BreedDescriptor::new();
        donor.insert_part(AgeStage::Youth, Sex::Male, "head", target("donor-head", 3));
        donor.insert_part(AgeStage::Youth, Sex::Male, "body", target("donor-body", 0));

        assert_eq!(desc.graft_slot("head", &donor), 1);
        let head = desc.part(AgeStage::Adult, Sex::Male, "head").unwrap();
        assert_eq!((head.sheet.as_str(), head.z), ("donor-head", 3));
        assert_eq!(desc.part(AgeStage::Adult, Sex::Male, "body").unwrap().sheet, "own-body");
        // The donor has no female parts at all
        assert_eq!(desc.part(AgeStage::Child, Sex::Female, "head").unwrap().sheet, "own-child");
        assert_eq!(desc.graft_slot("tail", &donor), 0);
        assert!(desc.parts(AgeStage::Youth, Sex::Male).is_none());
    }

    #[test]
    fn test_color_overrides() {
        let base = ColorTransform { red: 200, ..Default::default() };
        let overrides = ColorOverrides { green: Some(10), ..Default::default() };
        let merged = overrides.apply_to(base);
        assert_eq!(merged.red, 200);
        assert_eq!(merged.green, 10);
        assert_eq!(merged.blue, 128);
        assert!(ColorTransform::default().is_neutral());
    }
}
