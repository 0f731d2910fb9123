// project.rs — Circuit project data model and JSON loading
//
// A project is a graph of blocks connected by wires, plus the nested
// projects defining every compound block type it uses. The persisted `.ice`
// JSON document is deserialized straight into these types; key names
// (`id`, `type`, `data`, `ports`, `in`, `out`, `code`, `pin`, `value`,
// `source`, `target`, `block`, `port`) are part of the file format.
//
// Preconditions: none.
// Postconditions: `blocks`, `wires` and `deps` keep document order.
// Failure modes: missing keys or wrongly shaped blocks → MalformedProject.
// Side effects: `Project::load` reads one file.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

use crate::diag::CompileError;

pub const INPUT: &str = "basic.input";
pub const OUTPUT: &str = "basic.output";
pub const CODE: &str = "basic.code";

// ── Project / Graph ─────────────────────────────────────────────────────────

/// A circuit and the sub-circuits it depends on, keyed by block type name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Project {
    pub graph: Graph,
    #[serde(default)]
    pub deps: IndexMap<String, Project>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Graph {
    pub blocks: Vec<Block>,
    pub wires: Vec<Wire>,
}

impl Project {
    pub fn new(graph: Graph) -> Self {
        Project {
            graph,
            deps: IndexMap::new(),
        }
    }

    /// Register `project` as the definition of compound type `type_name`.
    pub fn with_dep(mut self, type_name: impl Into<String>, project: Project) -> Self {
        self.deps.insert(type_name.into(), project);
        self
    }

    pub fn from_json(source: &str) -> Result<Project, CompileError> {
        serde_json::from_str(source).map_err(|e| CompileError::malformed(e.to_string()))
    }

    pub fn from_value(value: serde_json::Value) -> Result<Project, CompileError> {
        serde_json::from_value(value).map_err(|e| CompileError::malformed(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Project, CompileError> {
        let source = std::fs::read_to_string(path).map_err(|source| CompileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Project::from_json(&source)
    }
}

impl Graph {
    pub fn new(blocks: Vec<Block>, wires: Vec<Wire>) -> Self {
        Graph { blocks, wires }
    }

    pub fn block(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }
}

// ── Blocks ──────────────────────────────────────────────────────────────────

/// Port lists of a module, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Ports {
    #[serde(rename = "in", default)]
    pub inputs: Vec<String>,
    #[serde(rename = "out", default)]
    pub outputs: Vec<String>,
}

/// Physical pin assigned to an input/output block.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Pin {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(deserialize_with = "pin_value")]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Input { pin: Option<Pin> },
    Output { pin: Option<Pin> },
    /// Inline Verilog body with its own port list.
    Code { ports: Ports, code: String },
    /// Instance of a sub-circuit defined in the enclosing project's `deps`.
    Compound { type_name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawBlock")]
pub struct Block {
    pub id: String,
    pub kind: BlockKind,
}

impl Block {
    pub fn input(id: impl Into<String>) -> Self {
        Block {
            id: id.into(),
            kind: BlockKind::Input { pin: None },
        }
    }

    pub fn output(id: impl Into<String>) -> Self {
        Block {
            id: id.into(),
            kind: BlockKind::Output { pin: None },
        }
    }

    pub fn code(id: impl Into<String>, ports: Ports, code: impl Into<String>) -> Self {
        Block {
            id: id.into(),
            kind: BlockKind::Code {
                ports,
                code: code.into(),
            },
        }
    }

    pub fn compound(id: impl Into<String>, type_name: impl Into<String>) -> Self {
        Block {
            id: id.into(),
            kind: BlockKind::Compound {
                type_name: type_name.into(),
            },
        }
    }

    /// Attach a pin; no-op on blocks that are not inputs or outputs.
    pub fn with_pin(mut self, value: impl Into<String>) -> Self {
        let new_pin = Pin {
            name: None,
            value: value.into(),
        };
        match &mut self.kind {
            BlockKind::Input { pin } | BlockKind::Output { pin } => *pin = Some(new_pin),
            _ => {}
        }
        self
    }

    /// The persisted `type` string.
    pub fn type_name(&self) -> &str {
        match &self.kind {
            BlockKind::Input { .. } => INPUT,
            BlockKind::Output { .. } => OUTPUT,
            BlockKind::Code { .. } => CODE,
            BlockKind::Compound { type_name } => type_name,
        }
    }

    pub fn is_io(&self) -> bool {
        matches!(self.kind, BlockKind::Input { .. } | BlockKind::Output { .. })
    }

    pub fn pin(&self) -> Option<&Pin> {
        match &self.kind {
            BlockKind::Input { pin } | BlockKind::Output { pin } => pin.as_ref(),
            _ => None,
        }
    }
}

// ── Wires ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Endpoint {
    pub block: String,
    pub port: String,
}

/// A connection between two block ports. Its index in `Graph::wires` is the
/// index of the net it is compiled to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Wire {
    pub source: Endpoint,
    pub target: Endpoint,
}

impl Wire {
    pub fn new(
        source_block: impl Into<String>,
        source_port: impl Into<String>,
        target_block: impl Into<String>,
        target_port: impl Into<String>,
    ) -> Self {
        Wire {
            source: Endpoint {
                block: source_block.into(),
                port: source_port.into(),
            },
            target: Endpoint {
                block: target_block.into(),
                port: target_port.into(),
            },
        }
    }
}

// ── Deserialization helpers ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawBlock {
    id: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    data: Option<RawBlockData>,
}

#[derive(Deserialize, Default)]
struct RawBlockData {
    #[serde(default)]
    pin: Option<Pin>,
    #[serde(default)]
    ports: Option<Ports>,
    #[serde(default)]
    code: Option<String>,
}

impl TryFrom<RawBlock> for Block {
    type Error = String;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        let data = raw.data.unwrap_or_default();
        let kind = match raw.type_name.as_str() {
            INPUT => BlockKind::Input { pin: data.pin },
            OUTPUT => BlockKind::Output { pin: data.pin },
            CODE => {
                let ports = data
                    .ports
                    .ok_or_else(|| format!("code block `{}` has no `ports`", raw.id))?;
                let code = data
                    .code
                    .ok_or_else(|| format!("code block `{}` has no `code`", raw.id))?;
                BlockKind::Code { ports, code }
            }
            _ => BlockKind::Compound {
                type_name: raw.type_name,
            },
        };
        Ok(Block { id: raw.id, kind })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPinValue {
    Text(String),
    Number(serde_json::Number),
}

fn pin_value<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match RawPinValue::deserialize(d)? {
        RawPinValue::Text(s) => s,
        RawPinValue::Number(n) => n.to_string(),
    })
}
