use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Base for every domain entity: a stable identity plus a property bag.
///
/// The identity is assigned once at construction and never changes. Two
/// entities are equal when their identities are equal, whatever their props.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity<P> {
    id: String,
    #[serde(flatten)]
    props: P,
}

impl<P> Entity<P> {
    /// Build an entity, generating a UUID v4 identity when none is supplied
    pub fn new(props: P, id: Option<String>) -> Self {
        Self {
            id: id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            props,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn props(&self) -> &P {
        &self.props
    }

    pub fn into_props(self) -> P {
        self.props
    }

    /// Swap the whole property bag, keeping the identity.
    ///
    /// Domain update methods validate the new bag and then call this.
    pub fn replace_props(&mut self, props: P) {
        self.props = props;
    }
}

impl<P: Serialize> Entity<P> {
    /// Flat JSON view: `{ "id": ..., ...props }`
    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

impl<P> PartialEq for Entity<P> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<P> Eq for Entity<P> {}
