//! Graphviz DOT export.
//!
//! Three views:
//!
//! - [`network_dot`]: one cluster per behavior, links between clusters;
//! - [`trace_dot`]: the same, with transitions that fired in a run in bold;
//! - [`space_dot`]: a behavioral space, final nodes with a double border;
//! - [`diagnoser_dot`]: the closures of a diagnoser, labelled with their
//!   entry node and diagnosis, and the observable arcs between them.
//!
//! Observability tags are drawn in `green4` and relevance tags in `red`.
//! Node ids are derived from numeric ids, so names never need quoting; names
//! only appear inside HTML labels, where they are escaped.

use fa_model::{Behavior, NetworkModel, Transition};
use fa_sim::ExecutionTrace;
use fa_space::{BehavioralSpace, Diagnoser};

/// The static structure of `model`.
pub fn network_dot(model: &NetworkModel) -> String {
    render_network(model, |_, _| false)
}

/// The structure of `model` with every transition that fired at least once
/// in `trace` drawn in bold.
pub fn trace_dot(model: &NetworkModel, trace: &ExecutionTrace) -> String {
    render_network(model, |b, t| trace.has_fired(b.id, t.id))
}

fn render_network(model: &NetworkModel, bold: impl Fn(&Behavior, &Transition) -> bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("digraph {} {{\n", quote(&model.name)));
    out.push_str("    graph [compound=true]\n");
    out.push_str("    node [shape=record]\n\n");

    out.push_str("    // links\n");
    for link in model.links.iter() {
        let [a, b] = link.endpoints;
        out.push_str(&format!(
            "    b{}_start -> b{}_start [label={} ltail=cluster_{} lhead=cluster_{}]\n",
            a.0,
            b.0,
            quote(&link.name),
            a.0,
            b.0,
        ));
    }

    for behavior in &model.behaviors {
        let id = behavior.id.0;
        out.push_str(&format!("\n    subgraph cluster_{id} {{\n"));
        out.push_str("        node [shape=ellipse]\n");

        let mut label = format!("<b>{}</b>", escape(&behavior.name));
        for t in &behavior.transitions {
            label.push_str(&format!("<br/>{}: {}", escape(&t.name), escape(&t.io_label(&model.links))));
        }
        out.push_str(&format!("        label = <{label}>\n"));

        out.push_str(&format!("        b{id}_start [style=invis]\n"));
        for state in &behavior.states {
            out.push_str(&format!(
                "        b{id}_s{} [label=<<b>{}</b>>]\n",
                state.id.0,
                escape(&state.name),
            ));
        }

        out.push_str(&format!("        b{id}_start -> b{id}_s{}\n", behavior.initial.0));
        for t in &behavior.transitions {
            let style = if bold(behavior, t) { " style=bold" } else { "" };
            out.push_str(&format!(
                "        b{id}_s{} -> b{id}_s{} [label=<{}{}>{style}]\n",
                t.source.0,
                t.destination.0,
                escape(&t.name),
                tags(&t.observability, &t.relevance),
            ));
        }
        out.push_str("    }\n");
    }

    out.push_str("}\n");
    out
}

/// A behavioral space; `model` is the network it was explored from.
pub fn space_dot(space: &BehavioralSpace, model: &NetworkModel) -> String {
    let mut out = String::new();
    out.push_str(&format!("digraph {} {{\n", quote(&format!("{} space", model.name))));
    out.push_str("    start [shape=circle style=invis]\n");
    if !space.nodes.is_empty() {
        out.push_str("    start -> n0\n");
    }

    for (i, node) in space.nodes.iter().enumerate() {
        let states = model
            .behaviors
            .iter()
            .zip(&node.states)
            .map(|(b, &s)| escape(b.state_name(s)))
            .collect::<Vec<_>>()
            .join(" ");
        let buffers = model
            .links
            .iter()
            .zip(&node.buffers)
            .map(|(l, slot)| format!("{}({})", escape(slot.as_deref().unwrap_or("ε")), escape(&l.name)))
            .collect::<Vec<_>>()
            .join(" ");
        let periphery = if node.is_final { " peripheries=2" } else { "" };
        out.push_str(&format!(
            "    n{i} [label=<<b>{i}</b><br/>{states} {buffers}<br/>obs: {}>{periphery}]\n",
            node.observation_index,
        ));
    }

    for arc in &space.arcs {
        let t = arc.transition(model);
        out.push_str(&format!(
            "    n{} -> n{} [label=<{}{}>]\n",
            arc.from,
            arc.to,
            escape(&t.name),
            tags(&t.observability, &t.relevance),
        ));
    }

    out.push_str("}\n");
    out
}

/// A diagnoser.  Closures with a diagnosis get a double border.
pub fn diagnoser_dot(diagnoser: &Diagnoser, name: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("digraph {} {{\n", quote(&format!("{name} diagnoser"))));
    out.push_str("    start [shape=circle style=invis]\n");
    if !diagnoser.closures.is_empty() {
        out.push_str("    start -> c0\n");
    }

    for (i, closure) in diagnoser.closures.iter().enumerate() {
        let (diagnosis, periphery) = match &closure.diagnosis {
            Some(d) => (tags("", display_expr(d)), " peripheries=2"),
            None => (String::new(), ""),
        };
        out.push_str(&format!(
            "    c{i} [label=<<b>{i}</b><br/>entry {}{diagnosis}>{periphery}]\n",
            closure.entry,
        ));
    }

    for arc in &diagnoser.arcs {
        out.push_str(&format!(
            "    c{} -> c{} [label=<{}>]\n",
            arc.from,
            arc.to,
            tags(&arc.observation, display_expr(&arc.relevance)),
        ));
    }

    out.push_str("}\n");
    out
}

/// ε spelled out, so empty expressions stay visible.
fn display_expr(expr: &str) -> &str {
    if expr.is_empty() { fa_space::relevance::EPSILON } else { expr }
}

fn tags(observability: &str, relevance: &str) -> String {
    let mut out = String::new();
    if !observability.is_empty() {
        out.push_str(&format!("<br/><font color=\"green4\">{}</font>", escape(observability)));
    }
    if !relevance.is_empty() {
        out.push_str(&format!("<br/><font color=\"red\">{}</font>", escape(relevance)));
    }
    out
}

/// Escape text for an HTML-like label.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Quote an identifier or plain label.
fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}
