use bitflags::bitflags;

/// High‑level semantic role of a view, similar to ARIA roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    Text,
    Button,
    TextField,
    Image,
    Container,
}

bitflags! {
    /// Capability tags the UI layer attaches to a node. Queries test these
    /// flags directly instead of probing the node's concrete kind.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Traits: u16 {
        const BUTTON = 1 << 0;
        const HEADER = 1 << 1;
        const STATIC_TEXT = 1 << 2;
        const IMAGE = 1 << 3;
        const SEARCH_FIELD = 1 << 4;
        const SELECTED = 1 << 5;
        const NOT_ENABLED = 1 << 6;
        const ADJUSTABLE = 1 << 7;
    }
}

impl Role {
    /// Traits a node of this role carries unless told otherwise.
    pub fn default_traits(self) -> Traits {
        match self {
            Role::Button => Traits::BUTTON,
            Role::Text => Traits::STATIC_TEXT,
            Role::Image => Traits::IMAGE,
            Role::TextField | Role::Container => Traits::empty(),
        }
    }
}

/// Semantics attached to a `View`, used to build the accessibility tree and
/// to locate nodes from UI-testing hooks.
#[derive(Clone, Debug, PartialEq)]
pub struct Semantics {
    pub role: Role,
    pub traits: Traits,
    /// Stable identifier for tests and automation. Never announced.
    pub identifier: Option<String>,
    /// Human‑readable label for screen readers.
    pub label: Option<String>,
    pub focused: bool,
    pub enabled: bool,
}

impl Semantics {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            traits: role.default_traits(),
            identifier: None,
            label: None,
            focused: false,
            enabled: true,
        }
    }

    pub fn identifier(mut self, id: impl Into<String>) -> Self {
        self.identifier = Some(id.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn traits(mut self, traits: Traits) -> Self {
        self.traits = traits;
        self
    }

    pub fn is_button(&self) -> bool {
        self.traits.contains(Traits::BUTTON)
    }
}
