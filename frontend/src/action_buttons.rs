use zoon::*;

/// Small outlined toolbar button.
pub fn action_button(label: &'static str, on_press: impl FnMut() + 'static) -> impl Element {
    let (hovered, hovered_signal) = Mutable::new_and_signal(false);
    Button::new()
        .s(Padding::new().x(10).y(4))
        .s(RoundedCorners::all(4))
        .s(Borders::all(Border::new().width(1).color("oklch(70% 0.03 255)")))
        .s(Font::new().size(13))
        .s(Background::new().color_signal(
            hovered_signal.map_bool(|| "oklch(92% 0.02 255)", || "oklch(98% 0.01 255)"),
        ))
        .on_hovered_change(move |is_hovered| hovered.set_neq(is_hovered))
        .label(label)
        .on_press(on_press)
}

/// Toggle that shows `on_label` / `off_label` depending on `state`.
pub fn toggle_button(state: Mutable<bool>, on_label: &'static str, off_label: &'static str) -> impl Element {
    let label = state.signal().map_bool(move || on_label, move || off_label);
    Button::new()
        .s(Padding::new().x(10).y(4))
        .s(RoundedCorners::all(4))
        .s(Borders::all(Border::new().width(1).color("oklch(70% 0.03 255)")))
        .s(Font::new().size(13))
        .label_signal(label.map(|text| Text::new(text)))
        .on_press(move || {
            let current = state.get();
            state.set(!current);
        })
}
