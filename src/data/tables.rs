//! Hand-curated mappings from numeric game codes to display names and prices.
//!
//! These encode game knowledge that must track upstream data; an unknown code
//! is an error rather than a blank cell.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized {table} code {code}")]
pub struct LookupError {
    pub table: &'static str,
    pub code: i64,
}

fn index<T: Copy>(table: &'static str, values: &[T], code: i64) -> Result<T, LookupError> {
    usize::try_from(code)
        .ok()
        .and_then(|i| values.get(i).copied())
        .ok_or(LookupError { table, code })
}

fn keyed<T: Copy>(table: &'static str, values: &[(i64, T)], code: i64) -> Result<T, LookupError> {
    values
        .iter()
        .find(|(key, _)| *key == code)
        .map(|(_, value)| *value)
        .ok_or(LookupError { table, code })
}

/// Target type for "random enemy (enemies)".
pub const RANDOM_ENEMIES_TARGET: i64 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Normal,
    Hard,
    Brutal,
    Nightmare,
}

impl Difficulty {
    pub fn from_digit(digit: char) -> Result<Self, LookupError> {
        match digit {
            '1' => Ok(Self::Normal),
            '2' => Ok(Self::Hard),
            '3' => Ok(Self::Brutal),
            '4' => Ok(Self::Nightmare),
            other => Err(LookupError {
                table: "difficulty",
                code: other.to_digit(10).map_or(-1, i64::from),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Hard => "Hard",
            Self::Brutal => "Brutal",
            Self::Nightmare => "Nightmare",
        }
    }

    /// Two letters are enough to tell Normal from Nightmare.
    pub fn short(&self) -> &'static str {
        &self.as_str()[..2]
    }
}

const FACTIONS: [&str; 17] = [
    "N/A",
    "Bannerlords",
    "High Elves",
    "Sacred Order",
    "N/A",
    "Ogryn Tribes",
    "Lizardmen",
    "Skinwalkers",
    "Orcs",
    "Demonspawn",
    "Undead Hordes",
    "Dark Elves",
    "Knights Revenant",
    "Barbarians",
    "N/A",
    "N/A",
    "Dwarves",
];

const AFFINITIES: [&str; 5] = ["", "Magic", "Force", "Spirit", "Void"];

const ROLES: [&str; 4] = ["Attack", "Defense", "HP", "Support"];

const RARITIES: [&str; 6] = ["", "Common", "Uncommon", "Rare", "Epic", "Legendary"];

const TARGET_TYPES: [&str; 41] = [
    "Single Target",
    "Self",
    "Target(s) of main effect",
    "Originator of relation",
    "Self",
    "Random ally (allies)",
    "Random enemy (enemies)",
    "All allies",
    "All enemies",
    "All dead allies",
    "10",
    "11",
    "12",
    "Random dead ally (allies)",
    "14",
    "15",
    "16",
    "17",
    "18",
    "Most damaged ally (by percent)",
    "Most damaged enemy (by percent)",
    "21",
    "Boss",
    "23",
    "24",
    "Random dead ally (allies)",
    "26",
    "27",
    "28",
    "All allies and enemies",
    "Ally that begins turn",
    "31",
    "Ally with lowest MAX HP",
    "33",
    "Enemy that killed this champion",
    "Champs with same champ ID as target",
    "36",
    "37",
    "Enemy with lowest turn meter",
    "Enemy with highest turn meter",
    "40",
];

const STAT_TYPES: [&str; 8] = [
    "HP",
    "Attack",
    "Defense",
    "Speed",
    "Resist",
    "Accuracy",
    "Crit Rate",
    "Crit Damage",
];

const AURA_AREAS: [&str; 8] = [
    "All Battles",
    "Campaign",
    "Dungeons",
    "Arena",
    "UNKNOWN",
    "Faction Crypts",
    "UNKNOWN",
    "Doom Tower",
];

const STATUS_TYPES: &[(i64, &str)] = &[
    (10, "Stun"),
    (20, "Freeze"),
    (30, "Sleep"),
    (40, "Provoke"),
    (50, "Counterattack"),
    (60, "Block Damage"),
    (70, "100% Heal Reduction"),
    (71, "50% Heal Reduction"),
    (80, "5% Poison"),
    (81, "2.5% Poison"),
    (90, "7.5% Continuous Heal"),
    (91, "15% Continuous Heal"),
    (100, "Block Debuffs"),
    (110, "Block Buffs"),
    (120, "25% Increase ATK"),
    (121, "50% Increase ATK"),
    (130, "25% Decrease ATK"),
    (131, "50% Decrease ATK"),
    (140, "30% Increase DEF"),
    (141, "60% Increase DEF"),
    (150, "30% Decrease DEF"),
    (151, "60% Decrease DEF"),
    (160, "15% Increase SPD"),
    (161, "30% Increase SPD"),
    (170, "15% Decrease SPD"),
    (171, "30% Decrease SPD"),
    (220, "25% Increase ACC"),
    (221, "50% Increase ACC"),
    (230, "25% Decrease ACC"),
    (231, "50% Decrease ACC"),
    (240, "15% Increase C. RATE"),
    (241, "30% Increase C. RATE"),
    (250, "15% Decrease C. RATE"),
    (251, "30% Decrease C. RATE"),
    (260, "15% Increase C. DMG"),
    (261, "30% Increase C. DMG"),
    (270, "15% Decrease C. DMG"),
    (271, "30% Decrease C. DMG"),
    (280, "Shield"),
    (290, "Block Cooldown Skills"),
    (300, "Revive on Death"),
    (310, "50% Ally Protection"),
    (311, "25% Ally Protection"),
    (320, "Unkillable"),
    (330, "Bomb"),
    (350, "25% Weaken"),
    (351, "15% Weaken"),
    (360, "Block Revive"),
    (410, "15% Reflect Damage"),
    (411, "30% Reflect Damage"),
    (440, "Hex"),
    (460, "Leech"),
    (470, "HP Burn"),
    (480, "Veil"),
    (481, "Perfect Veil"),
    (490, "Fear"),
    (491, "True Fear"),
    (500, "25% Poison Sensitivity"),
    (501, "50% Poison Sensitivity"),
    (510, "15% Strengthen"),
    (511, "25% Strengthen"),
];

// Example skills for each kind are listed where the meaning is not obvious.
const EFFECT_KINDS: &[(i64, &str)] = &[
    (0, "Revive"),
    (1000, "Heal"),
    (4000, "Place buff"),
    (4001, "Fill turn meter"),
    (4002, "Transfer Debuff"),
    (4003, "Remove Debuff"),
    (4004, "Activate other skill"),
    (4005, "Unlock secret skill"),
    (4006, "Ally attack"),
    (4007, "Extra turn"),
    (4008, "HP Equalize"),
    (4009, "Decrease skill cooldown"),
    (4010, "Decrease debuff duration"),
    (4011, "Increase buff duration"),
    (4012, "Counterattack"),
    // e.g. a stacking DEF increase each time the skill is used
    (4013, "Increase stat"),
    (4014, "Immunity"),
    (4017, "Reflect Damage"),
    // takes crit damage meant for allies
    (4018, "Transfer damage from allies"),
    (5000, "Place debuff"),
    (5001, "Decrease Turn Meter"),
    (5002, "Steal buff"),
    (5003, "Remove buff"),
    (5004, "Increase cooldown of target's skill(s)"),
    (5005, "Decrease buff duration"),
    (5007, "Exchange HP"),
    (5008, "Increase debuff duration"),
    (5009, "Decrease target's stat (always max HP so far)"),
    (5010, "Decrease bomb timer"),
    (5011, "Debuff spread"),
    (6000, "Damage"),
    (7000, "Guaranteed Crit"),
    (7001, "Ignore DEF"),
    (7002, "Passively decrease enemy ACC"),
    (7003, "Increase chance of other effect"),
    (7004, "Increase damage"),
    (7005, "Ignore certain buffs if certain debuffs present on enemy team or target"),
    // e.g. bonus damage equal to a share of the caster's shield
    (7006, "Adjust damage by some value that isn't a function of the ability's damage multiplier"),
    (7007, "Scale ability with number of debuffs on allies"),
    (9000, "Redirect debuff onto owner"),
    (9001, "Revive self while dead"),
    (11000, "Special"),
    (11001, "Special"),
];

/// Base sell price per artifact set, indexed by set id - 1.
const ARTIFACT_SET_BASE_PRICES: [f64; 42] = [
    6000.0,  // Life
    6000.0,  // Offense
    7200.0,  // Defense
    9000.0,  // Speed
    7200.0,  // Critical Rate
    18000.0, // Crit Damage
    7200.0,  // Accuracy
    9000.0,  // Resistance
    9000.0,  // Lifesteal
    11400.0, // Fury
    18000.0, // Daze
    18000.0, // Cursed
    18000.0, // Frost
    18000.0, // Frenzy
    18000.0, // Regeneration
    18000.0, // Immunity
    18000.0, // Shield
    18000.0, // Relentless
    18000.0, // Savage
    11400.0, // Destroy
    18000.0, // Stun
    18000.0, // Toxic
    18000.0, // Taunting
    11400.0, // Retaliation
    18000.0, // Avenging
    18000.0, // Stalwart
    18000.0, // Reflex
    14400.0, // Curing
    18000.0, // Cruel
    18000.0, // Immortal
    18000.0, // Divine Offense
    18000.0, // Divine Critical Rate
    18000.0, // Divine Life
    18000.0, // Divine Speed
    18000.0, // Swift Parry
    18000.0, // Deflection
    18000.0, // Resilience
    18000.0, // Perception
    18000.0, // Fatal
    18000.0, // Untouchable
    18000.0, // Affinitybreaker
    18000.0, // Frostbite
];

/// Indexed by artifact kind id - 1 (weapon, helmet, shield, ...).
const ITEM_KIND_VALUE_MULTIPLIERS: [f64; 9] = [0.75, 0.8, 0.85, 0.9, 0.95, 1.0, 1.1, 1.2, 1.4];

pub const ITEM_RARITY_VALUE_MULTIPLIERS: [f64; 5] = [1.0, 1.25, 1.5, 2.0, 3.0];

pub const ITEM_RANK_VALUE_MULTIPLIERS: [f64; 6] = [1.0, 2.0, 5.0, 10.0, 25.0, 40.0];

pub const ITEM_RANK_SELL_VALUE_MULTIPLIERS: [f64; 6] = [
    0.1111111,
    0.1,
    0.07692307692,
    0.0625,
    0.05555555556,
    0.05,
];

pub const ITEM_RANKS: usize = ITEM_RANK_VALUE_MULTIPLIERS.len();
pub const ITEM_RARITIES: usize = ITEM_RARITY_VALUE_MULTIPLIERS.len();

pub fn faction(code: i64) -> Result<&'static str, LookupError> {
    index("faction", &FACTIONS, code)
}

pub fn affinity(code: i64) -> Result<&'static str, LookupError> {
    index("affinity", &AFFINITIES, code)
}

pub fn role(code: i64) -> Result<&'static str, LookupError> {
    index("role", &ROLES, code)
}

pub fn rarity(code: i64) -> Result<&'static str, LookupError> {
    index("rarity", &RARITIES, code)
}

pub fn target_type(code: i64) -> Result<&'static str, LookupError> {
    index("effect target type", &TARGET_TYPES, code)
}

/// Aura stat by `StatKindId` (1-based).
pub fn aura_stat(stat_kind_id: i64) -> Result<&'static str, LookupError> {
    index("stat type", &STAT_TYPES, stat_kind_id - 1).map_err(|_| LookupError {
        table: "stat type",
        code: stat_kind_id,
    })
}

pub fn aura_area(code: i64) -> Result<&'static str, LookupError> {
    index("aura area", &AURA_AREAS, code)
}

pub fn effect_kind(code: i64) -> Result<&'static str, LookupError> {
    keyed("effect kind", EFFECT_KINDS, code)
}

/// Status names are informational; callers decide what an unknown id means.
pub fn status_type(code: i64) -> Option<&'static str> {
    keyed("status type", STATUS_TYPES, code).ok()
}

/// Artifact set base price by 1-based set id.
pub fn artifact_set_price(set_id: i64) -> Result<f64, LookupError> {
    index("artifact set", &ARTIFACT_SET_BASE_PRICES, set_id - 1).map_err(|_| LookupError {
        table: "artifact set",
        code: set_id,
    })
}

/// Artifact kind value multiplier by 1-based kind id.
pub fn item_kind_multiplier(kind_id: i64) -> Result<f64, LookupError> {
    index("artifact kind", &ITEM_KIND_VALUE_MULTIPLIERS, kind_id - 1).map_err(|_| LookupError {
        table: "artifact kind",
        code: kind_id,
    })
}
