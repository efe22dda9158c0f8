use console::{style, StyledObject};
use std::fmt::Display;

pub(crate) fn heading<D: Display>(text: D) -> StyledObject<D> {
    style(text).cyan().bold()
}

pub(crate) fn success<D: Display>(text: D) -> StyledObject<D> {
    style(text).green()
}

pub(crate) fn failure<D: Display>(text: D) -> StyledObject<D> {
    style(text).red()
}

pub(crate) fn hint<D: Display>(text: D) -> StyledObject<D> {
    style(text).dim()
}
