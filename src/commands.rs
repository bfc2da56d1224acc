use crate::Through;
use kinship::demo::{self, Atom, Compound, NamedRecord, Nucleus, Proton};
use kinship::output::{emit_success, OutputMode};
use kinship::ui::{self, Icons, TableBuilder};
use kinship::{Database, Entity, Pivot, PivotProtocol, QueryRepresentable, Siblings};

type AtomCompound = Pivot<Atom, Compound>;

pub fn run_init(db: &Database, output_mode: OutputMode) -> anyhow::Result<()> {
    if output_mode.is_human() {
        ui::header("Preparing demo schema");
    }
    demo::prepare_all(db)?;
    let tables = table_names();

    if output_mode.is_human() {
        ui::success("Demo tables ready");
        for table in &tables {
            ui::summary_row(Icons::DATABASE, &ui::table_name(table));
        }
        Ok(())
    } else {
        emit_success(output_mode, "init", serde_json::json!({ "tables": tables }))
    }
}

pub fn run_add_atom(db: &Database, name: &str, output_mode: OutputMode) -> anyhow::Result<()> {
    let mut atom = Atom::new(name);
    db.query::<Atom>().save(&mut atom)?;
    report_saved("add-atom", NamedRecord::from(&atom), output_mode)
}

pub fn run_add_compound(db: &Database, name: &str, output_mode: OutputMode) -> anyhow::Result<()> {
    let mut compound = Compound::new(name);
    db.query::<Compound>().save(&mut compound)?;
    report_saved("add-compound", NamedRecord::from(&compound), output_mode)
}

pub fn run_attach(
    db: &Database,
    atom_id: i64,
    compound_id: i64,
    through: Through,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let (atom, compound) = (find::<Atom>(db, atom_id)?, find::<Compound>(db, compound_id)?);
    match through {
        Through::Pivot => atom.siblings::<Compound>(db).attach(&atom, &compound)?,
        Through::Protons => Siblings::<Atom, Compound, Proton>::through(db, &atom).attach(&atom, &compound)?,
    }

    if output_mode.is_human() {
        ui::pair(Icons::LINK, &atom.name, "↔", &compound.name);
        Ok(())
    } else {
        emit_success(output_mode, "attach", pair_json(&atom, &compound, through))
    }
}

pub fn run_detach(
    db: &Database,
    atom_id: i64,
    compound_id: i64,
    through: Through,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let (atom, compound) = (find::<Atom>(db, atom_id)?, find::<Compound>(db, compound_id)?);
    match through {
        Through::Pivot => atom.siblings::<Compound>(db).detach(&atom, &compound)?,
        Through::Protons => Siblings::<Atom, Compound, Proton>::through(db, &atom).detach(&atom, &compound)?,
    }

    if output_mode.is_human() {
        ui::pair(Icons::UNLINK, &atom.name, "×", &compound.name);
        Ok(())
    } else {
        emit_success(output_mode, "detach", pair_json(&atom, &compound, through))
    }
}

pub fn run_related(
    db: &Database,
    atom_id: i64,
    compound_id: i64,
    through: Through,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let (atom, compound) = (find::<Atom>(db, atom_id)?, find::<Compound>(db, compound_id)?);
    let related = match through {
        Through::Pivot => atom.siblings::<Compound>(db).related(&atom, &compound)?,
        Through::Protons => Siblings::<Atom, Compound, Proton>::through(db, &atom).related(&atom, &compound)?,
    };

    if output_mode.is_human() {
        if related {
            ui::success(&format!("{} and {} are related", atom.name, compound.name));
        } else {
            ui::warn(&format!("{} and {} are not related", atom.name, compound.name));
        }
        Ok(())
    } else {
        let mut data = pair_json(&atom, &compound, through);
        data["related"] = serde_json::json!(related);
        emit_success(output_mode, "related", data)
    }
}

pub fn run_siblings(
    db: &Database,
    atom_id: Option<i64>,
    compound_id: Option<i64>,
    through: Through,
    sql: bool,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    if let Some(atom_id) = atom_id {
        let atom = find::<Atom>(db, atom_id)?;
        return match through {
            Through::Pivot => list(atom.siblings::<Compound>(db), sql, output_mode),
            Through::Protons => list(Siblings::<Atom, Compound, Proton>::through(db, &atom), sql, output_mode),
        };
    }

    let compound_id = compound_id.ok_or_else(|| anyhow::anyhow!("either --atom or --compound is required"))?;
    let compound = find::<Compound>(db, compound_id)?;
    match through {
        Through::Pivot => list(compound.siblings::<Atom>(db), sql, output_mode),
        Through::Protons => list(Siblings::<Compound, Atom, Proton>::through(db, &compound), sql, output_mode),
    }
}

pub fn run_stats(db: &Database, output_mode: OutputMode) -> anyhow::Result<()> {
    let counts = vec![
        (Atom::entity(), db.query::<Atom>().count()?),
        (Compound::entity(), db.query::<Compound>().count()?),
        (AtomCompound::entity(), db.query::<AtomCompound>().count()?),
        (Proton::entity(), db.query::<Proton>().count()?),
        (Nucleus::entity(), db.query::<Nucleus>().count()?),
    ];

    if output_mode.is_human() {
        ui::section("Database Statistics");
        let mut table = TableBuilder::new();
        for (name, count) in &counts {
            table.add_row(name, &count.to_string());
        }
        println!("{}", table.build());
        Ok(())
    } else {
        let data: serde_json::Map<String, serde_json::Value> = counts
            .into_iter()
            .map(|(name, count)| (name, serde_json::json!(count)))
            .collect();
        emit_success(output_mode, "stats", data)
    }
}

pub fn run_drop(db: &Database, output_mode: OutputMode) -> anyhow::Result<()> {
    demo::revert_all(db)?;
    if output_mode.is_human() {
        ui::success("Demo tables dropped");
        Ok(())
    } else {
        emit_success(output_mode, "drop", serde_json::json!({ "tables": table_names() }))
    }
}

fn table_names() -> Vec<String> {
    vec![
        Atom::entity(),
        Compound::entity(),
        AtomCompound::entity(),
        Proton::entity(),
        Nucleus::entity(),
    ]
}

fn find<E: Entity>(db: &Database, id: i64) -> anyhow::Result<E> {
    db.query::<E>()
        .filter(E::id_key(), id)
        .first()?
        .ok_or_else(|| anyhow::anyhow!("no {} with id {}", E::name(), id))
}

fn list<Local, Foreign, Via>(
    siblings: Siblings<'_, Local, Foreign, Via>,
    sql: bool,
    output_mode: OutputMode,
) -> anyhow::Result<()>
where
    Local: Entity,
    Foreign: Entity,
    Via: PivotProtocol,
    for<'r> NamedRecord: From<&'r Foreign>,
{
    if sql {
        let (statement, values) = siblings.make_query()?.select_sql().serialize();
        let values: Vec<String> = values.iter().map(ToString::to_string).collect();
        return if output_mode.is_human() {
            ui::sql(&statement, &values);
            Ok(())
        } else {
            emit_success(output_mode, "siblings", serde_json::json!({ "sql": statement, "values": values }))
        };
    }

    let records: Vec<NamedRecord> = siblings
        .all()?
        .iter()
        .map(NamedRecord::from)
        .collect();

    if output_mode.is_human() {
        ui::section(&format!("{} of {} via {}", Foreign::entity(), Local::name(), Via::entity()));
        if records.is_empty() {
            println!("  {}", ui::dim("none"));
        } else {
            println!("{}", ui::records_table(&records));
        }
        Ok(())
    } else {
        emit_success(output_mode, "siblings", records)
    }
}

fn report_saved(command: &str, record: NamedRecord, output_mode: OutputMode) -> anyhow::Result<()> {
    if output_mode.is_human() {
        ui::info(&record.name, &format!("saved with id {}", record.id));
        Ok(())
    } else {
        emit_success(output_mode, command, record)
    }
}

fn pair_json(atom: &Atom, compound: &Compound, through: Through) -> serde_json::Value {
    let table = match through {
        Through::Pivot => AtomCompound::entity(),
        Through::Protons => Proton::entity(),
    };
    serde_json::json!({
        "atom": NamedRecord::from(atom),
        "compound": NamedRecord::from(compound),
        "through": table,
    })
}
