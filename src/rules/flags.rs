use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

/// Bitset over the fixed entity attribute vocabulary.
///
/// Bit indices are part of the persisted configuration format and feed the automatic rule
/// priority, so they must never be reordered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct AttributeFlags(u16);

impl AttributeFlags {
    /// No attributes.
    pub const EMPTY: Self = Self(0);
    /// Matches any entity. Short-circuits matching when set on a goal.
    pub const ANY: Self = Self(1 << 0);
    /// A player character.
    pub const PLAYER: Self = Self(1 << 1);
    /// A hostile battle NPC.
    pub const ENEMY: Self = Self(1 << 2);
    /// A non-combat NPC.
    pub const NPC: Self = Self(1 << 3);
    /// An alliance member.
    pub const ALLIANCE: Self = Self(1 << 4);
    /// A party member.
    pub const PARTY: Self = Self(1 << 5);
    /// The local player.
    pub const SELF: Self = Self(1 << 6);
    /// Any damage dealer.
    pub const DPS: Self = Self(1 << 7);
    /// Any healer.
    pub const HEALER: Self = Self(1 << 8);
    /// Any tank.
    pub const TANK: Self = Self(1 << 9);
    /// Crafter or gatherer.
    pub const CRAFTER_GATHERER: Self = Self(1 << 10);
    /// Melee damage dealer (refines [`Self::DPS`]).
    pub const MELEE: Self = Self(1 << 11);
    /// Physical ranged damage dealer (refines [`Self::DPS`]).
    pub const PHYSICAL_RANGED: Self = Self(1 << 12);
    /// Magical ranged damage dealer (refines [`Self::DPS`]).
    pub const MAGICAL_RANGED: Self = Self(1 << 13);
    /// Regen-focused healer (refines [`Self::HEALER`]).
    pub const PURE_HEALER: Self = Self(1 << 14);
    /// Barrier-focused healer (refines [`Self::HEALER`]).
    pub const SHIELD_HEALER: Self = Self(1 << 15);

    /// Number of defined bits.
    pub const BIT_COUNT: u32 = 16;

    const DPS_REFINEMENTS: Self =
        Self(Self::MELEE.0 | Self::PHYSICAL_RANGED.0 | Self::MAGICAL_RANGED.0);
    const HEALER_REFINEMENTS: Self = Self(Self::PURE_HEALER.0 | Self::SHIELD_HEALER.0);

    /// Wrap raw bits.
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Raw bits.
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Return `true` when no bit is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Return `true` when every bit of `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Return `true` when `self` and `other` share at least one bit.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Set the bits of `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clear the bits of `other`.
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Indices of all set bits, ascending.
    pub fn indices(self) -> impl Iterator<Item = u32> {
        (0..Self::BIT_COUNT).filter(move |i| self.0 & (1 << i) != 0)
    }

    /// Sum of the indices of all set bits. Higher-index attributes are more specific.
    pub fn index_sum(self) -> i32 {
        self.indices().map(|i| i as i32).sum()
    }

    /// Drop parent role bits that are made redundant by a refinement bit.
    ///
    /// With `{DPS, MELEE}` only `MELEE` has to match; likewise for the healer refinements.
    pub fn normalized(self) -> Self {
        let mut out = self;
        if out.contains(Self::DPS) && out.intersects(Self::DPS_REFINEMENTS) {
            out.remove(Self::DPS);
        }
        if out.contains(Self::HEALER) && out.intersects(Self::HEALER_REFINEMENTS) {
            out.remove(Self::HEALER);
        }
        out
    }
}

impl BitOr for AttributeFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for AttributeFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for AttributeFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for AttributeFlags {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0)
    }
}

/// Set of class/job identifiers, one bit per [`ClassJob`]. Empty means "no job restriction".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct JobMask(u64);

impl JobMask {
    /// No jobs.
    pub const EMPTY: Self = Self(0);

    /// Wrap raw bits.
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Raw bits.
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Return `true` when no job is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Return `true` when both masks share a job.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Return `true` when `job` is in the mask.
    pub fn contains(self, job: ClassJob) -> bool {
        self.0 & job.bit() != 0
    }

    /// Copy with `job` added.
    pub fn with(self, job: ClassJob) -> Self {
        Self(self.0 | job.bit())
    }
}

impl FromIterator<ClassJob> for JobMask {
    fn from_iter<I: IntoIterator<Item = ClassJob>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

/// Playable class/job enumeration. Discriminants are the host's class/job row ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[allow(missing_docs)]
pub enum ClassJob {
    Adventurer = 0,
    Gladiator,
    Pugilist,
    Marauder,
    Lancer,
    Archer,
    Conjurer,
    Thaumaturge,
    Carpenter,
    Blacksmith,
    Armorer,
    Goldsmith,
    Leatherworker,
    Weaver,
    Alchemist,
    Culinarian,
    Miner,
    Botanist,
    Fisher,
    Paladin,
    Monk,
    Warrior,
    Dragoon,
    Bard,
    WhiteMage,
    BlackMage,
    Arcanist,
    Summoner,
    Scholar,
    Rogue,
    Ninja,
    Machinist,
    DarkKnight,
    Astrologian,
    Samurai,
    RedMage,
    BlueMage,
    Gunbreaker,
    Dancer,
    Reaper,
    Sage,
    Viper,
    Pictomancer,
}

impl ClassJob {
    /// Every job in id order.
    pub const ALL: [Self; 43] = {
        use ClassJob::*;
        [
            Adventurer,
            Gladiator,
            Pugilist,
            Marauder,
            Lancer,
            Archer,
            Conjurer,
            Thaumaturge,
            Carpenter,
            Blacksmith,
            Armorer,
            Goldsmith,
            Leatherworker,
            Weaver,
            Alchemist,
            Culinarian,
            Miner,
            Botanist,
            Fisher,
            Paladin,
            Monk,
            Warrior,
            Dragoon,
            Bard,
            WhiteMage,
            BlackMage,
            Arcanist,
            Summoner,
            Scholar,
            Rogue,
            Ninja,
            Machinist,
            DarkKnight,
            Astrologian,
            Samurai,
            RedMage,
            BlueMage,
            Gunbreaker,
            Dancer,
            Reaper,
            Sage,
            Viper,
            Pictomancer,
        ]
    };

    /// Look up a job by host row id.
    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    /// Host row id.
    pub fn id(self) -> u32 {
        self as u32
    }

    /// Single-bit mask for this job.
    pub fn bit(self) -> u64 {
        1u64 << self.id()
    }

    /// Role attribute bits implied by this job, including refinements.
    pub fn role_flags(self) -> AttributeFlags {
        use ClassJob::*;
        type F = AttributeFlags;
        match self {
            Adventurer | Pugilist | Lancer | Monk | Dragoon | Rogue | Ninja | Samurai | Reaper
            | Viper => F::DPS | F::MELEE,
            Archer | Bard | Machinist | Dancer => F::DPS | F::PHYSICAL_RANGED,
            Thaumaturge | BlackMage | Arcanist | Summoner | RedMage | BlueMage | Pictomancer => {
                F::DPS | F::MAGICAL_RANGED
            }
            Conjurer | WhiteMage | Astrologian => F::HEALER | F::PURE_HEALER,
            Scholar | Sage => F::HEALER | F::SHIELD_HEALER,
            Gladiator | Marauder | Paladin | Warrior | DarkKnight | Gunbreaker => F::TANK,
            Carpenter | Blacksmith | Armorer | Goldsmith | Leatherworker | Weaver | Alchemist
            | Culinarian | Miner | Botanist | Fisher => F::CRAFTER_GATHERER,
        }
    }
}

/// Group membership of a player entity relative to the local player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Membership {
    /// The entity is the local player.
    pub is_self: bool,
    /// The entity is in the local player's party.
    pub party: bool,
    /// The entity is in the local player's alliance.
    pub alliance: bool,
}

/// One side (source or destination) of a potential line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TargetDescriptor {
    /// Attribute bits.
    #[serde(default)]
    pub flags: AttributeFlags,
    /// Job restriction (rules) or the entity's current job (entities).
    #[serde(default)]
    pub jobs: JobMask,
}

impl TargetDescriptor {
    /// Descriptor with attribute flags and no job restriction.
    pub const fn new(flags: AttributeFlags) -> Self {
        Self {
            flags,
            jobs: JobMask::EMPTY,
        }
    }

    /// Copy with a job mask.
    pub fn with_jobs(self, jobs: JobMask) -> Self {
        Self { jobs, ..self }
    }

    /// Goal descriptor matching any entity.
    pub const fn any() -> Self {
        Self::new(AttributeFlags::ANY)
    }

    /// Describe a player character.
    pub fn for_player(job: Option<ClassJob>, membership: Membership) -> Self {
        let mut flags = AttributeFlags::ANY | AttributeFlags::PLAYER;
        if membership.is_self {
            flags |= AttributeFlags::SELF;
        }
        if membership.party {
            flags |= AttributeFlags::PARTY;
        }
        if membership.alliance {
            flags |= AttributeFlags::ALLIANCE;
        }
        let mut jobs = JobMask::EMPTY;
        if let Some(job) = job {
            flags |= job.role_flags();
            jobs = jobs.with(job);
        }
        Self { flags, jobs }
    }

    /// Describe a hostile battle NPC.
    pub const fn for_enemy() -> Self {
        Self::new(AttributeFlags::from_bits(
            AttributeFlags::ANY.bits() | AttributeFlags::ENEMY.bits(),
        ))
    }

    /// Describe any other NPC.
    pub const fn for_npc() -> Self {
        Self::new(AttributeFlags::from_bits(
            AttributeFlags::ANY.bits() | AttributeFlags::NPC.bits(),
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/rules/flags.rs"]
mod tests;
