//! The `rts` console command surface.
//!
//! Commands are parsed from a line of text into a [`Command`] and executed
//! against a [`GameRegistry`], producing a typed [`CommandOutcome`]. How the
//! outcome is shown to a player is up to the host; [`CommandOutcome`]
//! implements [`Display`](core::fmt::Display) for plain-text consoles.
//!
//! ```text
//! rts create <player> <x> <y> <z>
//! rts resources add <player> <TYPE> <amount>
//! rts resources get <player>
//! rts status <player>
//! rts build <player> <TYPE> <x> <y> <z>
//! rts train <player> <TYPE> <x> <y> <z>
//! rts rename <player> <name...>
//! rts upgrade <player>
//! rts info <TYPE>
//! rts save
//! ```

use core::fmt;
use core::str::FromStr;

use rtsmod_city::{ResourceLedger, building_blueprint, unit_blueprint};
use rtsmod_types::{
    BuildingType, ParseTagError, PlayerId, Position, ResourceType, UnitId, UnitType,
};

use crate::registry::{FlushReport, GameRegistry, RegistryError, read_city};
use crate::sync::CitySnapshot;

/// Errors from parsing or executing a command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The line is not an `rts` command at all.
    #[error("not an rts command")]
    NotRts,

    /// The subcommand is unknown.
    #[error("unknown subcommand: {0}")]
    UnknownSubcommand(String),

    /// Wrong number of arguments.
    #[error("usage: {0}")]
    Usage(&'static str),

    /// An argument did not parse.
    #[error("invalid {what}: {input}")]
    InvalidArgument {
        /// Which argument.
        what: &'static str,
        /// The offending text.
        input: String,
    },

    /// The registry rejected the command.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

const USAGE_CREATE: &str = "rts create <player> <x> <y> <z>";
const USAGE_RESOURCES: &str = "rts resources <add <player> <TYPE> <amount> | get <player>>";
const USAGE_STATUS: &str = "rts status <player>";
const USAGE_BUILD: &str = "rts build <player> <TYPE> <x> <y> <z>";
const USAGE_TRAIN: &str = "rts train <player> <TYPE> <x> <y> <z>";
const USAGE_RENAME: &str = "rts rename <player> <name...>";
const USAGE_UPGRADE: &str = "rts upgrade <player>";
const USAGE_INFO: &str = "rts info <TYPE>";
const USAGE_SAVE: &str = "rts save";

/// A building or unit kind named on the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A building kind.
    Building(BuildingType),
    /// A unit kind.
    Unit(UnitType),
}

impl FromStr for EntityKind {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<BuildingType>()
            .map(Self::Building)
            .or_else(|_ignored: ParseTagError| s.parse::<UnitType>().map(Self::Unit))
            .map_err(|_ignored: ParseTagError| ParseTagError {
                kind: "building or unit type",
                input: s.to_owned(),
            })
    }
}

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Found a city (or report the existing one).
    Create {
        /// Owning player.
        player: PlayerId,
        /// City origin.
        location: Position,
    },
    /// Credit resources to a city.
    AddResource {
        /// Owning player.
        player: PlayerId,
        /// Resource to credit.
        resource: ResourceType,
        /// Amount to credit.
        amount: u32,
    },
    /// Show a city's resources.
    GetResources {
        /// Owning player.
        player: PlayerId,
    },
    /// Show a city's full status.
    Status {
        /// Owning player.
        player: PlayerId,
    },
    /// Start a paid construction.
    Build {
        /// Owning player.
        player: PlayerId,
        /// Building kind.
        building_type: BuildingType,
        /// Construction site.
        position: Position,
    },
    /// Train a paid unit.
    Train {
        /// Owning player.
        player: PlayerId,
        /// Unit kind.
        unit_type: UnitType,
        /// Spawn position.
        position: Position,
    },
    /// Rename a city.
    Rename {
        /// Owning player.
        player: PlayerId,
        /// New name.
        name: String,
    },
    /// Raise a city one level.
    Upgrade {
        /// Owning player.
        player: PlayerId,
    },
    /// Describe a building or unit kind.
    Info(EntityKind),
    /// Save every city now.
    Save,
}

fn arg<T: FromStr>(what: &'static str, input: &str) -> Result<T, CommandError> {
    input.parse().map_err(|_ignored: T::Err| CommandError::InvalidArgument {
        what,
        input: input.to_owned(),
    })
}

fn position(x: &str, y: &str, z: &str) -> Result<Position, CommandError> {
    Ok(Position::new(
        arg("x coordinate", x)?,
        arg("y coordinate", y)?,
        arg("z coordinate", z)?,
    ))
}

impl Command {
    /// Parse one console line.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&"rts", rest)) = words.split_first() else {
            return Err(CommandError::NotRts);
        };

        match rest {
            ["create", player, x, y, z] => Ok(Self::Create {
                player: arg("player", player)?,
                location: position(x, y, z)?,
            }),
            ["create", ..] => Err(CommandError::Usage(USAGE_CREATE)),

            ["resources", "add", player, resource, amount] => Ok(Self::AddResource {
                player: arg("player", player)?,
                resource: arg("resource type", resource)?,
                amount: arg("amount", amount)?,
            }),
            ["resources", "get", player] => Ok(Self::GetResources {
                player: arg("player", player)?,
            }),
            ["resources", ..] => Err(CommandError::Usage(USAGE_RESOURCES)),

            ["status", player] => Ok(Self::Status {
                player: arg("player", player)?,
            }),
            ["status", ..] => Err(CommandError::Usage(USAGE_STATUS)),

            ["build", player, kind, x, y, z] => Ok(Self::Build {
                player: arg("player", player)?,
                building_type: arg("building type", kind)?,
                position: position(x, y, z)?,
            }),
            ["build", ..] => Err(CommandError::Usage(USAGE_BUILD)),

            ["train", player, kind, x, y, z] => Ok(Self::Train {
                player: arg("player", player)?,
                unit_type: arg("unit type", kind)?,
                position: position(x, y, z)?,
            }),
            ["train", ..] => Err(CommandError::Usage(USAGE_TRAIN)),

            ["rename", player, name @ ..] if !name.is_empty() => Ok(Self::Rename {
                player: arg("player", player)?,
                name: name.join(" "),
            }),
            ["rename", ..] => Err(CommandError::Usage(USAGE_RENAME)),

            ["upgrade", player] => Ok(Self::Upgrade {
                player: arg("player", player)?,
            }),
            ["upgrade", ..] => Err(CommandError::Usage(USAGE_UPGRADE)),

            ["info", kind] => Ok(Self::Info(arg("building or unit type", kind)?)),
            ["info", ..] => Err(CommandError::Usage(USAGE_INFO)),

            ["save"] => Ok(Self::Save),
            ["save", ..] => Err(CommandError::Usage(USAGE_SAVE)),

            [other, ..] => Err(CommandError::UnknownSubcommand((*other).to_owned())),
            [] => Err(CommandError::Usage(USAGE_CREATE)),
        }
    }

    /// Run the command against `registry`.
    pub fn execute(self, registry: &GameRegistry) -> Result<CommandOutcome, CommandError> {
        match self {
            Self::Create { player, location } => {
                let existed = registry.get_city(player).is_some();
                let handle = registry.create_city(player, location);
                let location = read_city(&handle).location();
                Ok(CommandOutcome::CityCreated {
                    owner: player,
                    location,
                    existed,
                })
            }
            Self::AddResource {
                player,
                resource,
                amount,
            } => {
                let total = registry.add_resource(player, resource, amount)?;
                Ok(CommandOutcome::ResourceAdded {
                    owner: player,
                    resource,
                    amount,
                    total,
                })
            }
            Self::GetResources { player } => {
                let handle = registry
                    .get_city(player)
                    .ok_or(RegistryError::CityNotFound(player))?;
                let resources = *read_city(&handle).resources();
                Ok(CommandOutcome::Resources {
                    owner: player,
                    resources,
                })
            }
            Self::Status { player } => registry
                .snapshot(player)
                .map(|snapshot| CommandOutcome::Status(Box::new(snapshot)))
                .ok_or_else(|| RegistryError::CityNotFound(player).into()),
            Self::Build {
                player,
                building_type,
                position,
            } => {
                registry.construct(player, building_type, position)?;
                Ok(CommandOutcome::ConstructionStarted {
                    owner: player,
                    building_type,
                    position,
                })
            }
            Self::Train {
                player,
                unit_type,
                position,
            } => {
                let id = registry.train_unit(player, unit_type, position)?;
                Ok(CommandOutcome::UnitTrained {
                    owner: player,
                    unit_type,
                    id,
                })
            }
            Self::Rename { player, name } => {
                registry.rename_city(player, &name)?;
                let name = registry
                    .city_stats(player)
                    .map(|stats| stats.name)
                    .ok_or(RegistryError::CityNotFound(player))?;
                Ok(CommandOutcome::Renamed {
                    owner: player,
                    name,
                })
            }
            Self::Upgrade { player } => {
                let level = registry.upgrade_city(player)?;
                Ok(CommandOutcome::Upgraded {
                    owner: player,
                    level,
                })
            }
            Self::Info(kind) => Ok(CommandOutcome::Info(EntityInfo::from(kind))),
            Self::Save => Ok(CommandOutcome::Saved(registry.flush_all())),
        }
    }
}

/// Catalog facts about one building or unit kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityInfo {
    /// Human-readable kind name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Health of a fresh instance.
    pub max_health: u32,
    /// Construction or training effort in ticks.
    pub build_time: u32,
    /// Price.
    pub cost: ResourceLedger,
    /// Contribution to city power.
    pub power: u32,
}

impl From<EntityKind> for EntityInfo {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Building(building_type) => {
                let b = building_blueprint(building_type);
                Self {
                    name: building_type.display_name(),
                    description: b.description,
                    max_health: b.max_health,
                    build_time: b.build_time,
                    cost: b.cost,
                    power: b.power,
                }
            }
            EntityKind::Unit(unit_type) => {
                let u = unit_blueprint(unit_type);
                Self {
                    name: unit_type.display_name(),
                    description: u.description,
                    max_health: u.max_health,
                    build_time: u.build_time,
                    cost: u.cost,
                    power: u.power,
                }
            }
        }
    }
}

/// The result of a successfully executed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// A city was founded, or already existed.
    CityCreated {
        /// Owning player.
        owner: PlayerId,
        /// Where the city actually is.
        location: Position,
        /// Whether the city existed before the command.
        existed: bool,
    },
    /// Resources were credited.
    ResourceAdded {
        /// Owning player.
        owner: PlayerId,
        /// Resource credited.
        resource: ResourceType,
        /// Amount credited.
        amount: u32,
        /// New stored amount.
        total: u32,
    },
    /// A city's resources.
    Resources {
        /// Owning player.
        owner: PlayerId,
        /// Every resource amount.
        resources: ResourceLedger,
    },
    /// A city's full status.
    Status(Box<CitySnapshot>),
    /// Construction began.
    ConstructionStarted {
        /// Owning player.
        owner: PlayerId,
        /// Building kind.
        building_type: BuildingType,
        /// Construction site.
        position: Position,
    },
    /// A unit was trained.
    UnitTrained {
        /// Owning player.
        owner: PlayerId,
        /// Unit kind.
        unit_type: UnitType,
        /// The new unit.
        id: UnitId,
    },
    /// A city was renamed.
    Renamed {
        /// Owning player.
        owner: PlayerId,
        /// The name now in effect.
        name: String,
    },
    /// A city gained a level.
    Upgraded {
        /// Owning player.
        owner: PlayerId,
        /// The new level.
        level: u32,
    },
    /// Catalog facts for a kind.
    Info(EntityInfo),
    /// Every city was saved.
    Saved(FlushReport),
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CityCreated {
                owner,
                location,
                existed: false,
            } => write!(f, "City created for {owner} at {location}"),
            Self::CityCreated {
                owner, location, ..
            } => write!(f, "{owner} already has a city at {location}"),
            Self::ResourceAdded {
                owner,
                resource,
                amount,
                total,
            } => write!(
                f,
                "Added {amount} {} to {owner} (now {total})",
                resource.display_name()
            ),
            Self::Resources { owner, resources } => write!(f, "Resources of {owner}: {resources}"),
            Self::Status(snapshot) => {
                write!(
                    f,
                    "{} (level {}) of {} at {}: population {}/{}, power {}, \
                     {} buildings ({} slots free), {} units;",
                    snapshot.name,
                    snapshot.level,
                    snapshot.owner,
                    snapshot.location,
                    snapshot.population,
                    snapshot.max_population,
                    snapshot.power,
                    snapshot.buildings.len(),
                    snapshot.available_build_slots,
                    snapshot.units.len()
                )?;
                for (resource, amount) in &snapshot.resources {
                    write!(f, " {}: {amount}", resource.display_name())?;
                }
                Ok(())
            }
            Self::ConstructionStarted {
                owner,
                building_type,
                position,
            } => write!(
                f,
                "{owner} started a {} at {position}",
                building_type.display_name()
            ),
            Self::UnitTrained {
                owner,
                unit_type,
                id,
            } => write!(f, "{owner} trained a {} ({id})", unit_type.display_name()),
            Self::Renamed { owner, name } => write!(f, "City of {owner} is now called {name}"),
            Self::Upgraded { owner, level } => {
                write!(f, "City of {owner} upgraded to level {level}")
            }
            Self::Info(info) => write!(
                f,
                "{}: {} Health {}, build time {}, power {}, cost: {}",
                info.name,
                info.description,
                info.max_health,
                info.build_time,
                info.power,
                info.cost
            ),
            Self::Saved(report) if report.failed == 0 => {
                write!(f, "Saved {} cities", report.saved)
            }
            Self::Saved(report) => write!(
                f,
                "Saved {} cities, {} failed",
                report.saved, report.failed
            ),
        }
    }
}
