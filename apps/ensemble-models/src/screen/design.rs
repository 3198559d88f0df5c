use makepad_widgets::*;

use super::ModelsScreen;

live_design! {
    use link::theme::*;
    use link::shaders::*;
    use link::widgets::*;
    use ensemble_widgets::theme::*;
    use ensemble_widgets::components::*;

    // ─── Catalog table ───────────────────────────────────────────────────────

    HeaderCell = <Label> {
        draw_text: {
            color: (TEXT_MUTED)
            text_style: <FONT_SEMIBOLD>{ font_size: 10.0 }
        }
    }

    CatalogHeader = <View> {
        width: Fill, height: 36
        flow: Right
        align: {y: 0.5}
        padding: {left: 16, right: 16}

        header_name = <HeaderCell> { width: 200 }
        header_kind = <HeaderCell> { width: 160 }
        header_description = <HeaderCell> { width: Fill }
        header_actions = <HeaderCell> { width: 260 }
    }

    // One model; buttons hand the row's name to the orchestrator
    CatalogRowItem = <View> {
        width: Fill, height: 44
        flow: Right
        align: {y: 0.5}
        padding: {left: 16, right: 16}
        show_bg: true
        draw_bg: {
            instance odd: 0.0
            fn pixel(self) -> vec4 {
                return mix((PANEL_BG), #fafbfc, self.odd);
            }
        }

        row_name = <Label> {
            width: 200
            draw_text: {
                color: (TEXT_PRIMARY)
                text_style: <FONT_MEDIUM>{ font_size: 11.5 }
                wrap: Ellipsis
            }
        }

        row_kind = <View> {
            width: 160, height: Fit
            kind_badge = <View> {
                width: Fit, height: Fit
                padding: {left: 6, right: 6, top: 2, bottom: 2}
                show_bg: true
                draw_bg: {
                    instance forest: 0.0
                    fn pixel(self) -> vec4 {
                        let sdf = Sdf2d::viewport(self.pos * self.rect_size);
                        sdf.box(0.0, 0.0, self.rect_size.x, self.rect_size.y, 3.0);
                        sdf.fill(mix((BLUE_100), (GREEN_100), self.forest));
                        return sdf.result;
                    }
                }
                kind_label = <Label> {
                    draw_text: {
                        color: (GRAY_700)
                        text_style: <FONT_MEDIUM>{ font_size: 9.5 }
                    }
                }
            }
        }

        row_description = <Label> {
            width: Fill
            draw_text: {
                color: (GRAY_700)
                text_style: <FONT_REGULAR>{ font_size: 11.0 }
                wrap: Ellipsis
            }
        }

        row_actions = <View> {
            width: 260, height: Fit
            flow: Right
            info_button = <RowButton> {}
            fit_button = <RowButton> {}
            predict_button = <RowButton> {}
            delete_button = <RowButton> {
                draw_bg: { btn_type: 1.0 }
                draw_text: { btn_type: 1.0 }
            }
        }
    }

    CatalogEmptyItem = <View> {
        width: Fill, height: Fit
        padding: {top: 32, bottom: 32}
        align: {x: 0.5}
        <Label> {
            text: "No models yet.\nUse New model to create one."
            draw_text: {
                color: (TEXT_MUTED)
                text_style: { font_size: 12.0 }
                wrap: Word
            }
        }
    }

    Divider = <View> {
        width: Fill, height: 1
        show_bg: true
        draw_bg: { color: (DIVIDER) }
    }

    // ─── Dialog bodies ───────────────────────────────────────────────────────

    CreateBody = <View> {
        width: Fill, height: Fit
        flow: Down

        kind_row = <View> {
            width: Fill, height: Fit
            flow: Right
            align: {y: 0.5}
            margin: {bottom: 10}

            <FieldLabel> { text: "Type" }
            kind_boosting_btn = <OptionButton> {}
            kind_forest_btn = <OptionButton> {}
        }

        name_field = <FormField> {
            field_label = { text: "Name" }
            input = { empty_text: "my-model" }
        }
        description_field = <FormField> {
            field_label = { text: "Description" }
            input = { empty_text: "optional" }
        }
        estimators_field = <FormField> {
            field_label = { text: "Estimators" }
            input = { empty_text: "100" }
        }
        depth_field = <FormField> {
            field_label = { text: "Max depth" }
            input = { empty_text: "unbounded" }
        }
        features_field = <FormField> {
            field_label = { text: "Feature subsample" }
            input = { empty_text: "1/3 of features" }
        }
        learning_rate_field = <FormField> {
            field_label = { text: "Learning rate" }
            input = { empty_text: "0.1" }
        }
    }

    FitBody = <View> {
        width: Fill, height: Fit
        flow: Down

        train_field = <FormField> {
            field_label = { text: "Training CSV" }
            input = { empty_text: "/path/to/train.csv" }
        }
        validation_field = <FormField> {
            field_label = { text: "Validation CSV" }
            input = { empty_text: "optional" }
        }
        target_field = <FormField> {
            field_label = { text: "Target column" }
            input = { empty_text: "price" }
        }
        data_description_field = <FormField> {
            field_label = { text: "Data description" }
            input = { empty_text: "optional" }
        }
    }

    PredictBody = <View> {
        width: Fill, height: Fit
        flow: Down

        test_field = <FormField> {
            field_label = { text: "Test CSV" }
            input = { empty_text: "/path/to/test.csv" }
        }
        column_field = <FormField> {
            field_label = { text: "Output column" }
            input = { empty_text: "prediction" }
        }
    }

    InfoSheet = <View> {
        width: Fill, height: Fit
        flow: Right

        info_labels = <Label> {
            width: 140
            draw_text: {
                color: (TEXT_MUTED)
                text_style: <FONT_MEDIUM>{ font_size: 11.0 }
            }
        }
        info_values = <Label> {
            width: Fill
            draw_text: {
                color: (TEXT_PRIMARY)
                text_style: <FONT_REGULAR>{ font_size: 11.0 }
                wrap: Ellipsis
            }
        }
    }

    // ─── Screen ──────────────────────────────────────────────────────────────

    pub ModelsScreen = {{ModelsScreen}} {
        width: Fill, height: Fill
        flow: Overlay

        show_bg: true
        draw_bg: { color: (PAGE_BG) }

        page = <View> {
            width: Fill, height: Fill
            flow: Down
            padding: {left: 24, right: 24, top: 20, bottom: 24}

            header = <View> {
                width: Fill, height: Fit
                flow: Right
                align: {y: 0.5}
                margin: {bottom: 16}

                <View> {
                    width: Fill, height: Fit
                    flow: Down
                    <SectionTitle> { text: "Models" }
                    catalog_status = <HintText> { margin: {top: 4} }
                }

                refresh_button = <SecondaryButton> { text: "Refresh" }
                new_model_button = <PrimaryButton> { text: "New model", margin: {right: 0} }
            }

            table = <View> {
                width: Fill, height: Fill
                flow: Down
                show_bg: true
                draw_bg: {
                    fn pixel(self) -> vec4 {
                        let sdf = Sdf2d::viewport(self.pos * self.rect_size);
                        sdf.box(0.0, 0.0, self.rect_size.x, self.rect_size.y, 6.0);
                        sdf.fill((PANEL_BG));
                        return sdf.result;
                    }
                }

                catalog_header = <CatalogHeader> {}
                <Divider> {}

                catalog_list = <PortalList> {
                    width: Fill, height: Fill
                    flow: Down

                    CatalogRowItem = <CatalogRowItem> {}
                    CatalogEmptyItem = <CatalogEmptyItem> {}
                }
            }
        }

        // The one dialog every workflow shares
        dialog_overlay = <View> {
            width: Fill, height: Fill
            visible: false
            align: {x: 0.5, y: 0.3}
            show_bg: true
            draw_bg: { color: (OVERLAY_BG) }

            dialog = <View> {
                width: 560, height: Fit
                flow: Down
                padding: {left: 20, right: 20, top: 18, bottom: 18}
                show_bg: true
                draw_bg: {
                    fn pixel(self) -> vec4 {
                        let sdf = Sdf2d::viewport(self.pos * self.rect_size);
                        sdf.box(0.0, 0.0, self.rect_size.x, self.rect_size.y, 8.0);
                        sdf.fill((PANEL_BG));
                        return sdf.result;
                    }
                }

                dialog_title = <SectionTitle> { margin: {bottom: 14} }

                dialog_body = <View> {
                    width: Fill, height: Fit
                    flow: Down

                    create_body = <CreateBody> { visible: false }
                    fit_body = <FitBody> { visible: false }
                    predict_body = <PredictBody> { visible: false }
                    info_body = <InfoSheet> { visible: false }

                    info_pending = <HintText> {
                        visible: false
                        text: "Loading model details…"
                    }

                    dialog_notice = <Label> {
                        width: Fill
                        visible: false
                        margin: {top: 6}
                        draw_text: {
                            color: (RED_600)
                            text_style: <FONT_REGULAR>{ font_size: 11.0 }
                            wrap: Word
                        }
                    }
                }

                dialog_footer = <View> {
                    width: Fill, height: Fit
                    flow: Right
                    align: {y: 0.5}
                    margin: {top: 18}

                    working_label = <HintText> { visible: false, text: "Working…" }
                    <View> { width: Fill, height: 1 }

                    export_button = <SecondaryButton> { visible: false, text: "Export diagnostics" }
                    dismiss_button = <SecondaryButton> { text: "Cancel" }
                    submit_button = <PrimaryButton> { text: "Create", margin: {right: 0} }
                }
            }
        }
    }
}
