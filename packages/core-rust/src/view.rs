//! Rendering contexts and per-field visibility.
//!
//! A field is rendered in up to six views. [`VisibilityMask`] stores one
//! independent flag per view; "only on" operations replace the whole mask,
//! while show/hide operations touch exactly one flag.

use serde::{Deserialize, Serialize};

/// One of the six rendering contexts of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// List/table page.
    Index,
    /// Read-only detail page.
    Detail,
    /// Creation form.
    Creation,
    /// Update form.
    Update,
    /// Spreadsheet export.
    Export,
    /// Spreadsheet import.
    Import,
}

impl View {
    /// All views in declaration order.
    pub const ALL: [View; 6] = [
        View::Index,
        View::Detail,
        View::Creation,
        View::Update,
        View::Export,
        View::Import,
    ];

    /// Lowercase wire name of the view.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            View::Index => "index",
            View::Detail => "detail",
            View::Creation => "creation",
            View::Update => "update",
            View::Export => "export",
            View::Import => "import",
        }
    }

    /// Maps a request action segment to the view it renders.
    ///
    /// Both the page and the submit action of a form select the same view
    /// (`create`/`store` -> creation, `edit`/`update` -> update).
    #[must_use]
    pub fn from_action(action: &str) -> Option<View> {
        match action {
            "index" => Some(View::Index),
            "detail" => Some(View::Detail),
            "create" | "store" => Some(View::Creation),
            "edit" | "update" => Some(View::Update),
            "export" => Some(View::Export),
            "import" => Some(View::Import),
            _ => None,
        }
    }

    /// Whether this view is one of the two forms.
    #[must_use]
    pub fn is_form(self) -> bool {
        matches!(self, View::Creation | View::Update)
    }
}

/// Six visibility flags, one per [`View`]. All flags default to `true`.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityMask {
    index: bool,
    detail: bool,
    creation: bool,
    update: bool,
    export: bool,
    import: bool,
}

impl VisibilityMask {
    /// Mask with every view shown.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            index: true,
            detail: true,
            creation: true,
            update: true,
            export: true,
            import: true,
        }
    }

    /// Mask with every view hidden.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            index: false,
            detail: false,
            creation: false,
            update: false,
            export: false,
            import: false,
        }
    }

    fn flag_mut(&mut self, view: View) -> &mut bool {
        match view {
            View::Index => &mut self.index,
            View::Detail => &mut self.detail,
            View::Creation => &mut self.creation,
            View::Update => &mut self.update,
            View::Export => &mut self.export,
            View::Import => &mut self.import,
        }
    }

    /// Reads the flag of `view`.
    #[must_use]
    pub fn is_shown_on(&self, view: View) -> bool {
        match view {
            View::Index => self.index,
            View::Detail => self.detail,
            View::Creation => self.creation,
            View::Update => self.update,
            View::Export => self.export,
            View::Import => self.import,
        }
    }

    /// Sets the flag of `view` to `shown`, leaving the others untouched.
    pub fn set(&mut self, view: View, shown: bool) {
        *self.flag_mut(view) = shown;
    }

    /// Sets the flag of `view` to `!hidden`.
    pub fn hide_from(&mut self, view: View, hidden: bool) {
        self.set(view, !hidden);
    }

    /// Sets the flag of `view` to `shown`.
    pub fn show_on(&mut self, view: View, shown: bool) {
        self.set(view, shown);
    }

    /// Shows the field on `view` only.
    pub fn only_on(&mut self, view: View) {
        *self = Self::none();
        self.set(view, true);
    }

    /// Shows the field on the creation and update forms only.
    pub fn only_on_forms(&mut self) {
        *self = Self::none();
        self.creation = true;
        self.update = true;
    }

    /// Shows the field everywhere except the two forms.
    pub fn except_on_forms(&mut self) {
        *self = Self::all();
        self.creation = false;
        self.update = false;
    }

    /// Views currently shown, in declaration order.
    pub fn shown_views(&self) -> impl Iterator<Item = View> + '_ {
        View::ALL.into_iter().filter(|v| self.is_shown_on(*v))
    }
}

impl Default for VisibilityMask {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn any_view() -> impl Strategy<Value = View> {
        prop::sample::select(View::ALL.to_vec())
    }

    #[test]
    fn default_mask_shows_everything() {
        let mask = VisibilityMask::default();
        for view in View::ALL {
            assert!(mask.is_shown_on(view), "{view:?} should be shown");
        }
    }

    #[test]
    fn only_on_forms_sets_creation_and_update() {
        let mut mask = VisibilityMask::default();
        mask.only_on_forms();
        assert_eq!(
            mask.shown_views().collect::<Vec<_>>(),
            vec![View::Creation, View::Update]
        );
    }

    #[test]
    fn except_on_forms_clears_only_forms() {
        let mut mask = VisibilityMask::none();
        mask.except_on_forms();
        assert_eq!(
            mask.shown_views().collect::<Vec<_>>(),
            vec![View::Index, View::Detail, View::Export, View::Import]
        );
    }

    #[test]
    fn from_action_maps_submit_actions_to_form_views() {
        assert_eq!(View::from_action("store"), Some(View::Creation));
        assert_eq!(View::from_action("update"), Some(View::Update));
        assert_eq!(View::from_action("index"), Some(View::Index));
        assert_eq!(View::from_action("delete"), None);
    }

    #[test]
    fn view_serializes_lowercase() {
        let json = serde_json::to_string(&View::Creation).expect("serialize");
        assert_eq!(json, "\"creation\"");
    }

    proptest! {
        #[test]
        fn only_on_shows_exactly_one_view(view in any_view(), start in any::<[bool; 6]>()) {
            let mut mask = VisibilityMask::none();
            for (v, on) in View::ALL.into_iter().zip(start) {
                mask.set(v, on);
            }
            mask.only_on(view);
            for other in View::ALL {
                prop_assert_eq!(mask.is_shown_on(other), other == view);
            }
        }

        #[test]
        fn show_and_hide_touch_one_flag(view in any_view(), cond in any::<bool>(), hide in any::<bool>()) {
            let before = VisibilityMask::default();
            let mut mask = before;
            if hide {
                mask.hide_from(view, cond);
            } else {
                mask.show_on(view, cond);
            }
            prop_assert_eq!(mask.is_shown_on(view), if hide { !cond } else { cond });
            for other in View::ALL.into_iter().filter(|v| *v != view) {
                prop_assert_eq!(mask.is_shown_on(other), before.is_shown_on(other));
            }
        }

        #[test]
        fn hide_then_show_is_last_write_wins(view in any_view()) {
            let mut mask = VisibilityMask::default();
            mask.hide_from(view, true);
            mask.show_on(view, true);
            prop_assert!(mask.is_shown_on(view));
        }
    }
}
