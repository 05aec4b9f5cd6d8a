//! Context projection: the subset of a resource's fields rendered in a view.

use crate::field::{FieldBuilder, FieldDescriptor, FieldType};
use crate::view::{View, VisibilityMask};

/// Anything carrying per-view visibility.
pub trait Visible {
    fn is_shown_on(&self, view: View) -> bool;
}

impl Visible for VisibilityMask {
    fn is_shown_on(&self, view: View) -> bool {
        VisibilityMask::is_shown_on(self, view)
    }
}

impl Visible for FieldDescriptor {
    fn is_shown_on(&self, view: View) -> bool {
        FieldDescriptor::is_shown_on(self, view)
    }
}

impl<T: FieldType> Visible for FieldBuilder<T> {
    fn is_shown_on(&self, view: View) -> bool {
        FieldBuilder::is_shown_on(self, view)
    }
}

/// Items shown on `view`, in their original order.
pub fn project_iter<T: Visible>(view: View, items: &[T]) -> impl Iterator<Item = &T> {
    items.iter().filter(move |item| item.is_shown_on(view))
}

/// Items shown on `view`, in their original order.
#[must_use]
pub fn project<T: Visible>(view: View, items: &[T]) -> Vec<&T> {
    project_iter(view, items).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;
    use crate::key::KeyConfig;

    #[test]
    fn alternating_index_visibility_keeps_order() {
        let keys = KeyConfig::default();
        let fields: Vec<FieldDescriptor> = (0..5)
            .map(|i| {
                fields::text(format!("f{i}"), format!("F{i}"))
                    .hide_from(View::Index, i % 2 == 1)
                    .build(&keys)
                    .expect("builds")
            })
            .collect();

        let visible = project(View::Index, &fields);
        let names: Vec<_> = visible.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["f0", "f2", "f4"]);

        let shown = fields.iter().filter(|f| f.is_shown_on(View::Index)).count();
        assert_eq!(visible.len(), shown);
    }

    #[test]
    fn projection_of_masks() {
        let mut detail_only = VisibilityMask::default();
        detail_only.only_on(View::Detail);
        let masks = [VisibilityMask::default(), detail_only, VisibilityMask::none()];
        assert_eq!(project(View::Detail, &masks).len(), 2);
        assert_eq!(project(View::Export, &masks).len(), 1);
    }

    #[test]
    fn empty_input_projects_empty() {
        let none: [VisibilityMask; 0] = [];
        assert!(project(View::Index, &none).is_empty());
    }
}
