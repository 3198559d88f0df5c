use makepad_widgets::*;

live_design! {
    use link::theme::*;
    use link::shaders::*;
    use link::widgets::*;
    use crate::theme::*;

    // ========================================================================
    // SHARED TEXT STYLES
    // ========================================================================

    // Section title: semibold, 16px, primary color
    pub SectionTitle = <Label> {
        draw_text: {
            color: (TEXT_PRIMARY)
            text_style: <FONT_SEMIBOLD>{ font_size: 16.0 }
        }
    }

    // Body text: regular, 11px, secondary gray
    pub BodyText = <Label> {
        draw_text: {
            color: (GRAY_700)
            text_style: <FONT_REGULAR>{ font_size: 11.0 }
            wrap: Word
        }
    }

    // Hint/muted text: regular, 10px, muted gray
    pub HintText = <Label> {
        draw_text: {
            color: (TEXT_MUTED)
            text_style: <FONT_REGULAR>{ font_size: 10.0 }
        }
    }

    // ========================================================================
    // BUTTONS
    // ========================================================================

    pub PrimaryButton = <Button> {
        width: Fit, height: 32
        padding: {left: 14, right: 14, top: 6, bottom: 6}
        margin: {right: 8}
        animator: {
            hover = {
                default: off,
                off = { from: {all: Forward {duration: 0.15}} apply: { draw_bg: {hover: 0.0} } }
                on  = { from: {all: Forward {duration: 0.15}} apply: { draw_bg: {hover: 1.0} } }
            }
        }
        draw_bg: {
            instance hover: 0.0
            instance disabled: 0.0
            fn pixel(self) -> vec4 {
                let sdf = Sdf2d::viewport(self.pos * self.rect_size);
                sdf.box(0.0, 0.0, self.rect_size.x, self.rect_size.y, 5.0);
                let color = mix((BLUE_500), (BLUE_700), self.hover);
                sdf.fill(mix(color, #93c5fd, self.disabled));
                return sdf.result;
            }
        }
        draw_text: {
            text_style: <FONT_MEDIUM>{ font_size: 11.0 }
            color: (WHITE)
        }
    }

    pub SecondaryButton = <Button> {
        width: Fit, height: 32
        padding: {left: 14, right: 14, top: 6, bottom: 6}
        margin: {right: 8}
        animator: {
            hover = {
                default: off,
                off = { from: {all: Forward {duration: 0.15}} apply: { draw_bg: {hover: 0.0} } }
                on  = { from: {all: Forward {duration: 0.15}} apply: { draw_bg: {hover: 1.0} } }
            }
        }
        draw_bg: {
            instance hover: 0.0
            fn pixel(self) -> vec4 {
                let sdf = Sdf2d::viewport(self.pos * self.rect_size);
                sdf.box(0.0, 0.0, self.rect_size.x, self.rect_size.y, 5.0);
                sdf.fill(mix(#f3f4f6, (DIVIDER), self.hover));
                return sdf.result;
            }
        }
        draw_text: {
            text_style: <FONT_MEDIUM>{ font_size: 11.0 }
            color: (TEXT_SECONDARY)
        }
    }

    // Small row action; btn_type 0 = neutral, 1 = danger
    pub RowButton = <Button> {
        width: Fit, height: 26
        padding: {left: 8, right: 8, top: 4, bottom: 4}
        margin: {right: 4}
        animator: {
            hover = {
                default: off,
                off = { from: {all: Forward {duration: 0.15}} apply: { draw_bg: {hover: 0.0} } }
                on  = { from: {all: Forward {duration: 0.15}} apply: { draw_bg: {hover: 1.0} } }
            }
        }
        draw_bg: {
            instance hover: 0.0
            instance btn_type: 0.0
            fn pixel(self) -> vec4 {
                let sdf = Sdf2d::viewport(self.pos * self.rect_size);
                sdf.box(0.0, 0.0, self.rect_size.x, self.rect_size.y, 4.0);
                let neutral = mix(#f3f4f6, (BLUE_100), self.hover);
                let danger = mix(#fef2f2, #fee2e2, self.hover);
                sdf.fill(mix(neutral, danger, self.btn_type));
                return sdf.result;
            }
        }
        draw_text: {
            instance btn_type: 0.0
            fn get_color(self) -> vec4 {
                return mix((GRAY_700), (RED_600), self.btn_type);
            }
            text_style: <FONT_MEDIUM>{ font_size: 10.0 }
        }
    }

    // Toggle for a small fixed set of choices
    pub OptionButton = <Button> {
        width: Fit, height: 28
        padding: {left: 10, right: 10, top: 4, bottom: 4}
        margin: {right: 4}
        animator: {
            hover = {
                default: off,
                off = { from: {all: Forward {duration: 0.15}} apply: { draw_bg: {hover: 0.0} } }
                on  = { from: {all: Forward {duration: 0.15}} apply: { draw_bg: {hover: 1.0} } }
            }
        }
        draw_bg: {
            instance hover: 0.0
            instance selected: 0.0
            fn pixel(self) -> vec4 {
                let sdf = Sdf2d::viewport(self.pos * self.rect_size);
                sdf.box(0.0, 0.0, self.rect_size.x, self.rect_size.y, 4.0);
                let normal = mix(#f3f4f6, (DIVIDER), self.hover);
                sdf.fill(mix(normal, (BLUE_100), self.selected));
                return sdf.result;
            }
        }
        draw_text: {
            text_style: <FONT_MEDIUM>{ font_size: 11.0 }
            color: (GRAY_700)
        }
    }

    // ========================================================================
    // FORM FIELDS
    // ========================================================================

    // Fixed width so inputs line up
    pub FieldLabel = <Label> {
        width: 140, height: Fit
        margin: {right: 8}
        draw_text: {
            color: (GRAY_700)
            text_style: <FONT_MEDIUM>{ font_size: 11.0 }
        }
    }

    pub InputContainer = <View> {
        width: Fill, height: 32
        show_bg: true
        draw_bg: {
            fn pixel(self) -> vec4 {
                let sdf = Sdf2d::viewport(self.pos * self.rect_size);
                sdf.box(0.5, 0.5, self.rect_size.x - 1.0, self.rect_size.y - 1.0, 4.0);
                sdf.fill(#f9fafb);
                sdf.box(0.5, 0.5, self.rect_size.x - 1.0, self.rect_size.y - 1.0, 4.0);
                sdf.stroke(#d1d5db, 1.0);
                return sdf.result;
            }
        }
        padding: {left: 8, right: 8}
        align: {y: 0.5}
    }

    pub FormInput = <TextInput> {
        width: Fill, height: Fill
        draw_text: {
            color: (TEXT_PRIMARY)
            color_focus: (TEXT_PRIMARY)
            color_empty: (TEXT_MUTED)
            color_empty_focus: (TEXT_MUTED)
            text_style: { font_size: 11.0 }
        }
        draw_bg: {
            fn pixel(self) -> vec4 { return vec4(0.0, 0.0, 0.0, 0.0); }
        }
        draw_selection: { color: (BLUE_100) color_focus: (BLUE_100) }
        draw_cursor: { color: (TEXT_PRIMARY) }
    }

    // Label + bordered input on one line
    pub FormField = <View> {
        width: Fill, height: Fit
        flow: Right
        align: {y: 0.5}
        margin: {bottom: 10}

        field_label = <FieldLabel> {}
        <InputContainer> {
            input = <FormInput> {}
        }
    }
}
