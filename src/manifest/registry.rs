use derive_more::Display;

use crate::filesystem::RegistryRecord;

/// Registry hive the install location is recorded under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum RegistryHive {
    #[default]
    #[display("HKCU")]
    CurrentUser,
    #[display("HKLM")]
    LocalMachine,
}

impl RegistryHive {
    pub fn for_install(per_machine: bool) -> Self {
        if per_machine {
            Self::LocalMachine
        } else {
            Self::CurrentUser
        }
    }
}

/// Vendor and application names that scope the uninstall registry key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryScope {
    pub manufacturer: String,
    pub short_name: String,
    pub hive: RegistryHive,
}

impl RegistryScope {
    pub fn key(&self) -> String {
        format!("Software\\{}\\{}", self.manufacturer, self.short_name)
    }

    /// The value recording where the application was installed, removed
    /// again by the uninstaller.
    pub fn install_path_record(&self) -> RegistryRecord {
        RegistryRecord {
            id: "RegistryInstallPath".to_string(),
            root: self.hive.to_string(),
            name: "InstallPath".to_string(),
            key: self.key(),
            value_type: "string".to_string(),
            value: "[APPLICATIONROOTDIRECTORY]".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(false, "HKCU")]
    #[case(true, "HKLM")]
    fn hive_follows_install_scope(#[case] per_machine: bool, #[case] expected: &str) {
        assert_eq!(RegistryHive::for_install(per_machine).to_string(), expected);
    }

    #[test]
    fn install_path_record_is_scoped_to_vendor_and_app() {
        let scope = RegistryScope {
            manufacturer: "Acme".into(),
            short_name: "rocket".into(),
            hive: RegistryHive::CurrentUser,
        };

        let record = scope.install_path_record();

        assert_eq!(record.id, "RegistryInstallPath");
        assert_eq!(record.root, "HKCU");
        assert_eq!(record.key, "Software\\Acme\\rocket");
        assert_eq!(record.value_type, "string");
        assert_eq!(record.value, "[APPLICATIONROOTDIRECTORY]");
    }
}
