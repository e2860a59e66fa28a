use std::collections::HashSet;
use std::fmt;

use crate::storage::RenameHistoryStore;
use crate::storage::data::ProfileType;


/// A preset named by some external artifact, such as a saved project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileReference {
    pub profile_type: ProfileType,
    pub name: String,
}

impl ProfileReference {

    pub fn new(profile_type: ProfileType, name: &str) -> Self {
        Self { profile_type, name: name.to_string() }
    }
}


/// A reference that can be pointed at the preset's current name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameUpdateOption {
    pub profile_type: ProfileType,
    pub old_name: String,
    pub new_name: String,
}

impl fmt::Display for RenameUpdateOption {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.profile_type {
            ProfileType::Printer => "Printer",
            ProfileType::Filament => "Material",
            ProfileType::Invalid => "Preset",
        };
        write!(f, "{}:\n   {}\n   -> {}", label, self.old_name, self.new_name)
    }
}


/// Resolve each reference and list the ones whose preset has been renamed.
///
/// Duplicate references produce a single option, in first-seen order.
pub fn collect_update_options<'a, I>(store: &RenameHistoryStore, references: I) -> Vec<RenameUpdateOption>
where
    I: IntoIterator<Item = &'a ProfileReference>,
{
    let mut seen: HashSet<(ProfileType, &str)> = HashSet::new();
    let mut options = Vec::new();
    for reference in references {
        if !seen.insert((reference.profile_type, reference.name.as_str())) {
            continue;
        }
        if let Some(new_name) = store.resolve(reference.profile_type, reference.name.as_str()) {
            options.push(RenameUpdateOption {
                profile_type: reference.profile_type,
                old_name: reference.name.clone(),
                new_name,
            });
        }
    }
    options
}


/// Update options with a per-item include flag; everything starts included.
#[derive(Debug, Clone)]
pub struct UpdateSelection {
    options: Vec<RenameUpdateOption>,
    included: Vec<bool>,
}

impl UpdateSelection {

    pub fn new(options: Vec<RenameUpdateOption>) -> Self {
        let included = vec![true; options.len()];
        Self { options, included }
    }

    pub fn options(&self) -> &[RenameUpdateOption] {
        self.options.as_slice()
    }

    pub fn is_included(&self, index: usize) -> bool {
        self.included.get(index).copied().unwrap_or(false)
    }

    /// Returns `false` when `index` is out of range.
    pub fn set(&mut self, index: usize, include: bool) -> bool {
        match self.included.get_mut(index) {
            Some(flag) => {
                *flag = include;
                true
            }
            None => false,
        }
    }

    pub fn toggle(&mut self, index: usize) -> bool {
        let include = !self.is_included(index);
        self.set(index, include)
    }

    pub fn selected(&self) -> Vec<RenameUpdateOption> {
        self.options.iter()
            .zip(self.included.iter())
            .filter(|(_, included)| **included)
            .map(|(option, _)| option.clone())
            .collect()
    }

    /// Point every reference covered by an included option at its new name.
    /// Returns the number of references rewritten.
    pub fn apply(&self, references: &mut [ProfileReference]) -> usize {
        let selected = self.selected();
        let mut changed = 0;
        for reference in references.iter_mut() {
            let found = selected.iter()
                .find(|o| o.profile_type == reference.profile_type && o.old_name == reference.name);
            if let Some(option) = found {
                reference.name = option.new_name.clone();
                changed += 1;
            }
        }
        changed
    }
}


#[cfg(test)]
mod test {

    use super::*;

    fn store() -> RenameHistoryStore {
        let mut store = RenameHistoryStore::in_memory(32);
        store.add_entry(ProfileType::Printer, "X1C 0.4", "X1 Carbon 0.4");
        store.add_entry(ProfileType::Filament, "PLA", "PLA Basic");
        store.add_entry(ProfileType::Filament, "PLA Basic", "Bambu PLA Basic");
        store
    }

    fn project() -> Vec<ProfileReference> {
        vec![
            ProfileReference::new(ProfileType::Printer, "X1C 0.4"),
            ProfileReference::new(ProfileType::Filament, "PLA"),
            ProfileReference::new(ProfileType::Filament, "PETG"),
            ProfileReference::new(ProfileType::Filament, "PLA"),
        ]
    }

    #[test]
    fn collects_moved_references_once() {
        let refs = project();
        let options = collect_update_options(&store(), &refs);
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].new_name, "X1 Carbon 0.4");
        assert_eq!(options[1].old_name, "PLA");
        assert_eq!(options[1].new_name, "Bambu PLA Basic");
    }

    #[test]
    fn describes_option() {
        let option = RenameUpdateOption {
            profile_type: ProfileType::Filament,
            old_name: "PLA".to_string(),
            new_name: "PLA Basic".to_string(),
        };
        assert_eq!(option.to_string(), "Material:\n   PLA\n   -> PLA Basic");
    }

    #[test]
    fn apply_only_included_options() {
        let mut refs = project();
        let mut selection = UpdateSelection::new(collect_update_options(&store(), &refs));
        assert!(selection.is_included(0));
        assert!(selection.toggle(0));
        assert!(!selection.is_included(0));
        assert!(!selection.set(9, true));

        let changed = selection.apply(&mut refs);
        assert_eq!(changed, 2);
        assert_eq!(refs[0].name, "X1C 0.4");
        assert_eq!(refs[1].name, "Bambu PLA Basic");
        assert_eq!(refs[2].name, "PETG");
        assert_eq!(refs[3].name, "Bambu PLA Basic");
        assert_eq!(selection.selected().len(), 1);
    }
}
