// uiconf-core/src/item.rs
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// A fixed set of item identifiers a widget knows how to handle
pub trait BuiltinName: Copy + Eq + std::fmt::Debug + 'static {
    const ALL: &'static [Self];

    fn name(self) -> &'static str;

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.name() == name)
    }
}

/// Declare an enum of builtin item names with their string forms
#[macro_export]
macro_rules! builtin_names {
    ($(#[$meta:meta])* $vis:vis enum $ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $ty {
            $($variant),+
        }

        impl $crate::BuiltinName for $ty {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }
        }
    };
}

/// Item identifier: a builtin name or an arbitrary extension string
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemName<B> {
    Builtin(B),
    Custom(String),
}

impl<B: BuiltinName> ItemName<B> {
    pub fn parse(name: &str) -> Self {
        match B::from_name(name) {
            Some(builtin) => Self::Builtin(builtin),
            None => Self::Custom(name.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Builtin(b) => b.name(),
            Self::Custom(s) => s,
        }
    }

    pub fn builtin(&self) -> Option<B> {
        match self {
            Self::Builtin(b) => Some(*b),
            Self::Custom(_) => None,
        }
    }
}

impl<B: BuiltinName> From<B> for ItemName<B> {
    fn from(builtin: B) -> Self {
        Self::Builtin(builtin)
    }
}

impl<B: BuiltinName> Serialize for ItemName<B> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de, B: BuiltinName> Deserialize<'de> for ItemName<B> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::parse(&name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemLocation {
    #[default]
    Before,
    After,
    Center,
}

/// Either a bare item name or a full item object
#[derive(Deserialize)]
#[serde(untagged)]
enum ItemRepr<T> {
    Name(String),
    Full(T),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", bound(serialize = "B: BuiltinName"))]
pub struct ToolbarItem<B> {
    pub name: Option<ItemName<B>>,
    pub text: Option<String>,
    pub icon: String,
    pub location: ItemLocation,
    /// `None` lets the widget decide
    pub visible: Option<bool>,
    pub disabled: bool,
}

impl<B: BuiltinName> ToolbarItem<B> {
    pub fn named(name: impl Into<ItemName<B>>) -> Self {
        Self {
            name: Some(name.into()),
            text: None,
            icon: String::new(),
            location: ItemLocation::Before,
            visible: None,
            disabled: false,
        }
    }

    pub fn at(mut self, location: ItemLocation) -> Self {
        self.location = location;
        self
    }

    pub fn builtin(&self) -> Option<B> {
        self.name.as_ref().and_then(ItemName::builtin)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToolbarItemFields {
    name: Option<String>,
    text: Option<String>,
    #[serde(default)]
    icon: String,
    #[serde(default)]
    location: ItemLocation,
    visible: Option<bool>,
    #[serde(default)]
    disabled: bool,
}

impl<'de, B: BuiltinName> Deserialize<'de> for ToolbarItem<B> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match ItemRepr::<ToolbarItemFields>::deserialize(deserializer)? {
            ItemRepr::Name(name) => Self {
                name: Some(ItemName::parse(&name)),
                text: None,
                icon: String::new(),
                location: ItemLocation::Before,
                visible: None,
                disabled: false,
            },
            ItemRepr::Full(f) => Self {
                name: f.name.as_deref().map(ItemName::parse),
                text: f.text,
                icon: f.icon,
                location: f.location,
                visible: f.visible,
                disabled: f.disabled,
            },
        })
    }
}

/// Context menu entry, possibly with a submenu
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", bound(serialize = "B: BuiltinName"))]
pub struct MenuItem<B> {
    pub name: Option<ItemName<B>>,
    pub text: Option<String>,
    pub icon: String,
    pub visible: Option<bool>,
    pub disabled: bool,
    pub begin_group: bool,
    pub items: Vec<MenuItem<B>>,
}

impl<B: BuiltinName> MenuItem<B> {
    pub fn named(name: impl Into<ItemName<B>>) -> Self {
        Self {
            name: Some(name.into()),
            text: None,
            icon: String::new(),
            visible: None,
            disabled: false,
            begin_group: false,
            items: Vec::new(),
        }
    }

    pub fn builtin(&self) -> Option<B> {
        self.name.as_ref().and_then(ItemName::builtin)
    }

    /// Depth-first search by name through submenus
    pub fn find(&self, name: &str) -> Option<&MenuItem<B>> {
        if self.name.as_ref().is_some_and(|n| n.as_str() == name) {
            return Some(self);
        }
        self.items.iter().find_map(|item| item.find(name))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "B: BuiltinName"))]
struct MenuItemFields<B> {
    name: Option<String>,
    text: Option<String>,
    #[serde(default)]
    icon: String,
    visible: Option<bool>,
    #[serde(default)]
    disabled: bool,
    #[serde(default)]
    begin_group: bool,
    #[serde(default = "Vec::new")]
    items: Vec<MenuItem<B>>,
}

impl<'de, B: BuiltinName> Deserialize<'de> for MenuItem<B> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match ItemRepr::<MenuItemFields<B>>::deserialize(deserializer)? {
            ItemRepr::Name(name) => Self::named(ItemName::parse(&name)),
            ItemRepr::Full(f) => Self {
                name: f.name.as_deref().map(ItemName::parse),
                text: f.text,
                icon: f.icon,
                visible: f.visible,
                disabled: f.disabled,
                begin_group: f.begin_group,
                items: f.items,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    crate::builtin_names! {
        enum Action {
            Create => "create",
            Refresh => "refresh",
            Separator => "separator",
        }
    }

    #[test]
    fn test_builtin_or_custom() {
        assert_eq!(ItemName::<Action>::parse("create"), ItemName::Builtin(Action::Create));
        assert_eq!(
            ItemName::<Action>::parse("archive"),
            ItemName::Custom("archive".to_string())
        );
        assert_eq!(ItemName::<Action>::parse("archive").as_str(), "archive");
    }

    #[test]
    fn test_mixed_toolbar_list() {
        let items: Vec<ToolbarItem<Action>> = serde_json::from_value(json!([
            "create",
            { "name": "separator", "location": "after" },
            { "text": "Share", "icon": "share" }
        ]))
        .unwrap();

        assert_eq!(items[0].builtin(), Some(Action::Create));
        assert_eq!(items[1].location, ItemLocation::After);
        assert_eq!(items[2].name, None);
        assert_eq!(items[2].icon, "share");
    }

    #[test]
    fn test_nested_menu_items() {
        let item: MenuItem<Action> = serde_json::from_value(json!({
            "text": "More",
            "items": ["refresh", { "name": "zip", "text": "Compress" }]
        }))
        .unwrap();

        assert_eq!(item.items.len(), 2);
        assert_eq!(item.find("zip").unwrap().text.as_deref(), Some("Compress"));
        assert_eq!(item.find("refresh").unwrap().builtin(), Some(Action::Refresh));
    }

    #[test]
    fn test_serializes_names_as_strings() {
        let item = ToolbarItem::named(Action::Separator).at(ItemLocation::After);
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["name"], json!("separator"));
        assert_eq!(value["location"], json!("after"));
    }
}
