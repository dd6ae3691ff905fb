#[derive(Debug, Clone, Default)]
pub struct RoutingContext {
    pub postal_code: Option<String>,
}
