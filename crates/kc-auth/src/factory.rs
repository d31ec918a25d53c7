//! Factory registering the group username/password form.

use std::sync::Arc;

use crate::authenticator::{
    Authenticator, AuthenticatorFactory, ConfigProperty, ConfigPropertyType, Requirement,
};
use crate::config::{DEFAULT_NOTE_NAME, FULL_PATH, NOTE_NAME};
use crate::group_form::{GroupUsernamePasswordForm, PROVIDER_ID};

static REQUIREMENT_CHOICES: [Requirement; 1] = [Requirement::Required];

static CONFIG_PROPERTIES: [ConfigProperty; 2] = [
    ConfigProperty {
        name: NOTE_NAME,
        label: "User session note name",
        help_text: "Name of the user session note receiving the matched group. Leave empty to skip the note.",
        property_type: ConfigPropertyType::String,
        default_value: DEFAULT_NOTE_NAME,
    },
    ConfigProperty {
        name: FULL_PATH,
        label: "Full group path",
        help_text: "Include full path to group i.e. /top/level1/level2, false will just specify the group name",
        property_type: ConfigPropertyType::Boolean,
        default_value: "true",
    },
];

/// Describes [`GroupUsernamePasswordForm`] and hands out its shared instance.
#[derive(Debug, Clone)]
pub struct GroupUsernamePasswordFormFactory {
    authenticator: Arc<GroupUsernamePasswordForm>,
}

impl GroupUsernamePasswordFormFactory {
    /// Creates a factory around `authenticator`.
    #[must_use]
    pub fn new(authenticator: GroupUsernamePasswordForm) -> Self {
        Self {
            authenticator: Arc::new(authenticator),
        }
    }
}

impl AuthenticatorFactory for GroupUsernamePasswordFormFactory {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn display_type(&self) -> &'static str {
        "Group Username Password Form"
    }

    fn help_text(&self) -> &'static str {
        "Validates a group, username and password from login form."
    }

    fn reference_category(&self) -> &'static str {
        "password"
    }

    fn is_configurable(&self) -> bool {
        true
    }

    fn is_user_setup_allowed(&self) -> bool {
        false
    }

    fn requirement_choices(&self) -> &'static [Requirement] {
        &REQUIREMENT_CHOICES
    }

    fn config_properties(&self) -> &'static [ConfigProperty] {
        &CONFIG_PROPERTIES
    }

    fn create(&self) -> Arc<dyn Authenticator> {
        self.authenticator.clone()
    }
}
