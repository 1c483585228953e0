use std::rc::Rc;

use tracing::debug;

use super::object::{SceneObject, Shared};

/// Splits the trailing run of decimal digits off `name`, e.g. `"mat12"` into
/// `("mat", 12)`. Names without trailing digits, or with more than fit in a
/// `u64`, keep the whole name as base and count from zero
pub(crate) fn split_numeric_suffix(name: &str) -> (&str, u64) {
    let base = name.trim_end_matches(|c: char| c.is_ascii_digit());
    match name[base.len()..].parse::<u64>() {
        Ok(suffix) => (base, suffix),
        Err(_) => (name, 0),
    }
}

fn name_taken<T: ?Sized + SceneObject>(list: &[Shared<T>], candidate: &str) -> bool {
    list.iter().any(|member| member.borrow().name() == candidate)
}

/// First of `name`, `base{suffix+1}`, `base{suffix+2}`, ... that nothing in
/// `list` is called
pub(crate) fn unique_name<T: ?Sized + SceneObject>(name: &str, list: &[Shared<T>]) -> String {
    if !name_taken(list, name) {
        return name.to_owned();
    }

    let (base, mut suffix) = split_numeric_suffix(name);
    loop {
        suffix += 1;
        let candidate = format!("{base}{suffix}");
        if !name_taken(list, &candidate) {
            return candidate;
        }
    }
}

/// Appends `object` to `list`, renaming it first if another member already
/// uses its name. Anonymous objects are appended as they are. Returns false,
/// and leaves both untouched, if `object` itself is already in the list
pub(crate) fn add_unique<T: ?Sized + SceneObject>(object: &Shared<T>, list: &mut Vec<Shared<T>>) -> bool {
    if list.iter().any(|member| Rc::ptr_eq(member, object)) {
        return false;
    }

    let name = object.borrow().name().to_owned();
    if !name.is_empty() {
        let unique = unique_name(&name, list);
        if unique != name {
            debug!("renaming '{name}' to '{unique}' to keep names unique");
            object.borrow_mut().set_name(unique);
        }
    }

    list.push(Rc::clone(object));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{LambertBsdf, SharedBsdf};
    use crate::scene::object::shared;

    fn lambert(name: &str) -> SharedBsdf {
        let mut bsdf = LambertBsdf::default();
        bsdf.set_name(name.to_owned());
        shared(bsdf)
    }

    fn names(list: &[SharedBsdf]) -> Vec<String> {
        list.iter().map(|b| b.borrow().name().to_owned()).collect()
    }

    #[test]
    fn test_split_numeric_suffix() {
        assert_eq!(split_numeric_suffix("mat12"), ("mat", 12));
        assert_eq!(split_numeric_suffix("mat"), ("mat", 0));
        assert_eq!(split_numeric_suffix("007"), ("", 7));
        assert_eq!(split_numeric_suffix("mat007"), ("mat", 7));
        assert_eq!(split_numeric_suffix(""), ("", 0));

        let huge = "x123456789012345678901234567890";
        assert_eq!(split_numeric_suffix(huge), (huge, 0));
    }

    #[test]
    fn test_duplicate_names_are_numbered() {
        let mut list: Vec<SharedBsdf> = Vec::new();
        assert!(add_unique(&lambert("mat"), &mut list));
        assert!(add_unique(&lambert("mat"), &mut list));
        assert!(add_unique(&lambert("mat9"), &mut list));
        assert!(add_unique(&lambert("mat9"), &mut list));
        assert_eq!(names(&list), ["mat", "mat1", "mat9", "mat10"]);
    }

    #[test]
    fn test_numbering_skips_taken_names() {
        let mut list: Vec<SharedBsdf> = Vec::new();
        for name in ["x", "x1", "x2", "x"] {
            add_unique(&lambert(name), &mut list);
        }
        assert_eq!(names(&list), ["x", "x1", "x2", "x3"]);
    }

    #[test]
    fn test_same_identity_is_not_added_twice() {
        let mut list: Vec<SharedBsdf> = Vec::new();
        let bsdf = lambert("white");
        assert!(add_unique(&bsdf, &mut list));
        assert!(!add_unique(&bsdf, &mut list));
        assert_eq!(list.len(), 1);
        assert_eq!(bsdf.borrow().name(), "white");
    }

    #[test]
    fn test_anonymous_objects_skip_uniqueness() {
        let mut list: Vec<SharedBsdf> = Vec::new();
        add_unique(&lambert(""), &mut list);
        add_unique(&lambert(""), &mut list);
        assert_eq!(names(&list), ["", ""]);
    }

    #[test]
    fn test_rename_leaves_first_holder_alone() {
        let mut list: Vec<SharedBsdf> = Vec::new();
        let first = lambert("glass");
        add_unique(&first, &mut list);
        let second = lambert("glass");
        add_unique(&second, &mut list);
        assert!(second.borrow().int_medium().is_none());
        assert_eq!(second.borrow().name(), "glass1");
        assert_eq!(first.borrow().name(), "glass");
    }
}
