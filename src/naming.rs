use crate::error::NameError;
use crate::storage::RenameHistoryStore;
use crate::storage::data::ProfileType;


pub const ILLEGAL_CHARACTERS: &[char] = &['<', '>', '[', ']', ':', '/', '\\', '|', '?', '*', '"'];

/// Marker appended to presets with unsaved changes.
pub const MODIFIED_SUFFIX: &str = " (modified)";

pub const RESERVED_NAMES: &[&str] = &["Default Setting", "Default Filament", "Default Printer"];


/// View onto the preset collection that owns the actual profiles.
pub trait PresetLookup {

    fn preset_exists(&self, name: &str) -> bool;

    /// Preset name that `alias` stands for, if it is an alias.
    fn resolve_alias(&self, alias: &str) -> Option<String>;
}


/// Check a user-typed rename of `original` and return the name to record.
///
/// Surrounding whitespace is trimmed first. `lookup` adds the collision checks
/// against existing presets and aliases.
pub fn validate_new_name(original: &str, candidate: &str, lookup: Option<&dyn PresetLookup>) -> Result<String, NameError> {
    let name = candidate.trim();

    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name == original {
        return Err(NameError::Unchanged);
    }
    if let Some(c) = name.chars().find(|c| ILLEGAL_CHARACTERS.contains(c)) {
        return Err(NameError::IllegalCharacter(c));
    }
    if name.contains(MODIFIED_SUFFIX) {
        return Err(NameError::IllegalSuffix(MODIFIED_SUFFIX));
    }
    if RESERVED_NAMES.contains(&name) {
        return Err(NameError::Reserved);
    }

    if let Some(lookup) = lookup {
        if lookup.preset_exists(name) {
            return Err(NameError::AlreadyExists(name.to_string()));
        }
        if let Some(target) = lookup.resolve_alias(name) {
            if target != name {
                return Err(NameError::AliasCollision);
            }
        }
    }

    Ok(name.to_string())
}


/// Validate `candidate` and record `original -> candidate` in the history.
pub fn rename_preset(
    store: &mut RenameHistoryStore,
    lookup: Option<&dyn PresetLookup>,
    profile_type: ProfileType,
    original: &str,
    candidate: &str,
) -> Result<String, NameError> {
    let name = validate_new_name(original, candidate, lookup)?;
    store.add_entry(profile_type, original, name.as_str());
    Ok(name)
}
