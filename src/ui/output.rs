use crate::ui::{theme, Icons};

pub fn header(text: &str) {
    let t = theme();
    println!("{} {}", Icons::ATOM, t.paint(&t.title, text));
}

pub fn success(label: &str) {
    let t = theme();
    println!("{} {}", Icons::CHECK, t.paint(&t.ok, label));
}

pub fn error(label: &str) {
    let t = theme();
    eprintln!("{} {}", Icons::CROSS, t.paint(&t.failure, label));
}

pub fn warn(label: &str) {
    let t = theme();
    eprintln!("{} {}", Icons::WARN, t.paint(&t.caution, label));
}

pub fn info(label: &str, value: &str) {
    let t = theme();
    println!("{} {}: {}", Icons::INFO, t.paint(&t.label, label), value);
}

pub fn section(title: &str) {
    let t = theme();
    println!();
    println!("━{}━", t.paint(&t.title, title));
}

/// Statement text followed by its bound values
pub fn sql(statement: &str, values: &[String]) {
    let t = theme();
    println!("{}", t.paint(&t.statement, statement));
    if !values.is_empty() {
        let bound: Vec<String> = values.iter().map(|v| t.paint(&t.binding, v)).collect();
        println!("  {} [{}]", dim("bound"), bound.join(", "));
    }
}

/// Two records joined by a relation marker, e.g. `Hydrogen ↔ Water`
pub fn pair(icon: &str, left: &str, marker: &str, right: &str) {
    let t = theme();
    println!(
        "{} {} {} {}",
        icon,
        t.paint(&t.record, left),
        dim(marker),
        t.paint(&t.record, right)
    );
}

pub fn dim(text: &str) -> String {
    let t = theme();
    t.paint(&t.faint, text)
}

pub fn table_name(name: &str) -> String {
    let t = theme();
    t.paint(&t.table, name)
}

pub fn summary_row(label: &str, value: &str) {
    let t = theme();
    println!("  {} {}", t.paint(&t.label, label), value);
}
