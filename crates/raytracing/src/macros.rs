/// Implements `SceneObject::name` and `SceneObject::set_name` by forwarding
/// to a `String` field, e.g. `forward_name!(base.name);`
macro_rules! forward_name {
    ($($field:ident).+) => {
        fn name(&self) -> &str {
            &self.$($field).+
        }

        fn set_name(&mut self, name: String) {
            self.$($field).+ = name;
        }
    };
}

pub(crate) use forward_name;
