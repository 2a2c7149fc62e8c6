use series_select::config::{
    AutoFilter, AutoFilterParams, DEFAULT_MAX_SIZE, OptionsError, SelectOptions,
};
use series_select::models::Label;

#[test]
fn booleans_toggle_defaults() {
    assert_eq!(AutoFilter::parse("false").unwrap(), AutoFilter::Off);
    assert_eq!(AutoFilter::parse("null").unwrap(), AutoFilter::Off);

    let on = AutoFilter::parse("true").unwrap();
    let r = on.resolve("type", "value").unwrap();
    assert_eq!(r.label_field, "type");
    assert_eq!(r.value_field, "value");
    assert_eq!(r.options, SelectOptions::default());
    assert_eq!(r.options.max_size, DEFAULT_MAX_SIZE);
}

#[test]
fn object_overrides_chart_fields() {
    let auto = AutoFilter::parse(r#"{"value_field": "score", "max_size": 3, "base_label": 7}"#).unwrap();
    let r = auto.resolve("type", "value").unwrap();
    assert_eq!(r.label_field, "type");
    assert_eq!(r.value_field, "score");
    assert_eq!(r.options.max_size, 3);
    assert_eq!(r.options.base_label, Some(Label::from(7i64)));
}

#[test]
fn invalid_parameters_are_rejected() {
    assert!(matches!(AutoFilter::parse("3"), Err(OptionsError::Parse(_))));
    assert!(matches!(
        AutoFilter::parse(r#"{"maxSize": 3}"#),
        Err(OptionsError::Parse(_))
    ));
    assert!(matches!(
        AutoFilter::parse(r#"{"label_field": ""}"#),
        Err(OptionsError::EmptyField("label_field"))
    ));
}

#[test]
fn serializes_back_to_the_short_form() {
    assert_eq!(serde_json::to_string(&AutoFilter::Off).unwrap(), "false");
    let on = AutoFilter::On(AutoFilterParams::default());
    assert_eq!(serde_json::to_string(&on).unwrap(), "true");
}

#[test]
fn select_options_fill_missing_fields() {
    let opts: SelectOptions<Label> = serde_json::from_str(r#"{"base_label": "GDP"}"#).unwrap();
    assert_eq!(opts.max_size, DEFAULT_MAX_SIZE);
    assert_eq!(opts.base_label, Some(Label::from("GDP")));
}
