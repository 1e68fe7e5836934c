//! DOM implementations of the dashboard and simulator views
//!
//! Missing elements are skipped silently, so one view works on pages that
//! only carry part of the layout.

use crate::dom::{self, by_id, element, query, set_class};
use crate::sparkline;
use clinker_config::ParameterDefinition;
use clinker_data::RollingSeries;
use clinker_integration::{
    AlertListView, AlertListing, ChartView, ClockView, MetricEntry, MetricsView, SimulatorView,
    StatusReading, StatusTier, StatusView,
};
use clinker_shared::{ClinkerResult, StageId};
use web_sys::{Document, Element, HtmlCanvasElement, HtmlImageElement};

const PLACEHOLDER_STYLE: &str = "color: #666; text-align: center; padding: 1rem;";
const TITLE_STYLE: &str = "font-weight: 600; margin-bottom: 0.25rem;";
const TIME_STYLE: &str = "float: right; font-size: 0.75rem; opacity: 0.7;";
const MESSAGE_STYLE: &str = "font-size: 0.8rem; opacity: 0.8;";

fn set_text(document: &Document, id: &str, text: &str) {
    if let Some(el) = by_id::<Element>(document, id) {
        el.set_text_content(Some(text));
    }
}

fn log_failure(what: &str, result: ClinkerResult<()>) {
    if let Err(e) = result {
        log::warn!("Failed to render {what}: {e}");
    }
}

pub struct DomDashboardView {
    document: Document,
}

impl DomDashboardView {
    pub fn new() -> ClinkerResult<Self> {
        Ok(Self {
            document: dom::document()?,
        })
    }

    fn metric_node(&self, metric: &MetricEntry) -> ClinkerResult<Element> {
        let div = element(&self.document, "div", "metric", None)?;
        let value = element(&self.document, "div", "metric-value", Some(&metric.value))?;
        let label = element(&self.document, "div", "metric-label", Some(&metric.label))?;
        div.append_child(&value)?;
        div.append_child(&label)?;
        Ok(div)
    }

    fn fill_alerts(&self, list: &Element, listing: &AlertListing) -> ClinkerResult<()> {
        list.set_inner_html("");
        match listing {
            AlertListing::Placeholder(text) => {
                let div = element(&self.document, "div", "", Some(text))?;
                div.set_attribute("style", PLACEHOLDER_STYLE)?;
                list.append_child(&div)?;
            }
            AlertListing::Items(alerts) => {
                for alert in alerts {
                    let item = element(&self.document, "div", &alert.class, None)?;

                    let title = element(&self.document, "div", "", Some(&alert.title))?;
                    title.set_attribute("style", TITLE_STYLE)?;
                    if let Some(time) = &alert.time {
                        let span = element(&self.document, "span", "", Some(time))?;
                        span.set_attribute("style", TIME_STYLE)?;
                        title.append_child(&span)?;
                    }

                    let message = element(&self.document, "div", "", Some(&alert.message))?;
                    message.set_attribute("style", MESSAGE_STYLE)?;

                    item.append_child(&title)?;
                    item.append_child(&message)?;
                    list.append_child(&item)?;
                }
            }
        }
        Ok(())
    }
}

impl ChartView for DomDashboardView {
    fn render_series(&mut self, stage: StageId, series: &RollingSeries) {
        let Some(canvas) = by_id::<HtmlCanvasElement>(&self.document, &format!("{stage}-chart"))
        else {
            return;
        };
        log_failure("chart", sparkline::draw(&canvas, &series.values()));
    }
}

impl StatusView for DomDashboardView {
    fn render_status(&mut self, stage: StageId, reading: &StatusReading) {
        let Some(status) = query(&self.document, &format!("#{stage} .parameter-status")) else {
            return;
        };
        status.set_text_content(Some(&reading.text()));
        for tier in StatusTier::ALL {
            set_class(&status, tier.css_class(), false);
        }
        set_class(&status, reading.tier.css_class(), true);
    }
}

impl MetricsView for DomDashboardView {
    fn render_metrics(&mut self, stage: StageId, metrics: &[MetricEntry]) {
        let Some(container) = by_id::<Element>(&self.document, &format!("{stage}-metrics")) else {
            return;
        };
        container.set_inner_html("");
        for metric in metrics {
            let result = self
                .metric_node(metric)
                .and_then(|node| container.append_child(&node).map(|_| ()).map_err(Into::into));
            log_failure("metric", result);
        }
    }
}

impl AlertListView for DomDashboardView {
    fn render_alerts(&mut self, listing: &AlertListing) {
        let Some(list) = by_id::<Element>(&self.document, dom::ALERT_LIST_ID) else {
            return;
        };
        log_failure("alerts", self.fill_alerts(&list, listing));
    }
}

impl ClockView for DomDashboardView {
    fn render_clock(&mut self, text: &str) {
        set_text(&self.document, dom::CURRENT_TIME_ID, text);
    }
}

pub struct DomSimulatorView {
    document: Document,
}

impl DomSimulatorView {
    pub fn new() -> ClinkerResult<Self> {
        Ok(Self {
            document: dom::document()?,
        })
    }

    fn row(&self, def: &ParameterDefinition) -> ClinkerResult<Element> {
        let row = element(&self.document, "div", dom::PARAM_ROW_CLASS, None)?;

        let label = element(&self.document, "label", "", Some(def.label))?;
        label.set_attribute("for", def.key)?;

        let input = element(&self.document, "input", "", None)?;
        input.set_attribute("type", "number")?;
        input.set_id(def.key);
        input.set_attribute("data-param", def.key)?;
        input.set_attribute("step", "0.01")?;
        input.set_attribute("placeholder", "Enter value")?;

        row.append_child(&label)?;
        row.append_child(&input)?;
        Ok(row)
    }
}

impl ClockView for DomSimulatorView {
    fn render_clock(&mut self, text: &str) {
        set_text(&self.document, dom::SIM_TIME_ID, text);
    }
}

impl SimulatorView for DomSimulatorView {
    fn render_rows(&mut self, parameters: &[ParameterDefinition]) {
        let Some(controls) = by_id::<Element>(&self.document, dom::SIM_CONTROLS_ID) else {
            return;
        };
        for def in parameters {
            let result = self
                .row(def)
                .and_then(|row| controls.append_child(&row).map(|_| ()).map_err(Into::into));
            log_failure("parameter row", result);
        }
    }

    fn set_row_error(&mut self, key: &str, errored: bool) {
        let row = by_id::<Element>(&self.document, key)
            .and_then(|input| input.closest(&format!(".{}", dom::PARAM_ROW_CLASS)).ok().flatten());
        if let Some(row) = row {
            set_class(&row, dom::ERROR_CLASS, errored);
        }
    }

    fn show_step_image(&mut self, src: &str) {
        if let Some(img) = by_id::<HtmlImageElement>(&self.document, dom::STEP_IMAGE_ID) {
            img.set_src(src);
        }
    }

    fn show_banner(&mut self, text: Option<&str>) {
        let Some(banner) = by_id::<Element>(&self.document, dom::OUT_OF_BOUNDS_ID) else {
            return;
        };
        banner.set_text_content(Some(text.unwrap_or_default()));
        set_class(&banner, dom::HIDDEN_CLASS, text.is_none());
    }

    fn show_efficiency(&mut self, text: &str) {
        let Some(message) = by_id::<Element>(&self.document, dom::EFFICIENCY_ID) else {
            return;
        };
        message.set_text_content(Some(text));
        set_class(&message, dom::HIDDEN_CLASS, false);
    }

    fn render_raw(&mut self, text: &str) {
        set_text(&self.document, dom::SIMULATOR_FRAME_ID, text);
    }
}
