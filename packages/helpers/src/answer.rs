use cosmwasm_std::{attr, Attribute, Event, Response};

pub fn response<A: Into<Attribute>, T>(
    ty: &str,
    contract_name: &str,
    attrs: impl IntoIterator<Item = A>,
) -> Response<T> {
    Response::<T>::new()
        .add_event(Event::new(format!("{}-{}", contract_name, ty)).add_attributes(attrs))
}

/// Renders a cw20 amount as `cw20:<contract>:<amount>`.
pub fn attr_cw20(
    key: impl Into<String>,
    amount: impl std::fmt::Display,
    asset: impl std::fmt::Display,
) -> Attribute {
    attr(key, format!("cw20:{}:{}", asset, amount))
}
