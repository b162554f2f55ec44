use super::*;

const ALL: [Colour; 6] =
    [Colour::Neutral, Colour::Primary, Colour::Secondary, Colour::Accent, Colour::Ghost, Colour::Link];

#[test]
fn every_colour_maps_to_its_btn_class() {
    for colour in ALL {
        assert_eq!(colour.button_class(), format!("btn-{colour}"));
    }
}

#[test]
fn primary_class() {
    assert_eq!(Colour::Primary.button_class(), "btn-primary");
}

#[test]
fn display_uses_lowercase_name() {
    assert_eq!(Colour::Ghost.to_string(), "ghost");
    assert_eq!(Colour::Link.to_string(), "link");
}
