//! Human-readable table dump

use std::fmt;

use crate::{Ain, AinType, Variable};

impl Ain {
    fn type_name(&self, ty: &AinType) -> String {
        match ty.struct_no.and_then(|no| self.structures.get(no)) {
            Some(s) => format!("struct {}", s.name),
            None => ty.to_string(),
        }
    }

    fn write_var(&self, f: &mut fmt::Formatter<'_>, var: &Variable) -> fmt::Result {
        write!(f, "{} {}", self.type_name(&var.ty), var.name)
    }
}

impl fmt::Display for Ain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; ain version {}", self.version)?;

        for (no, s) in self.structures.iter().enumerate() {
            write!(f, "struct {} {} {{", no, s.name)?;
            for member in &s.members {
                f.write_str(" ")?;
                self.write_var(f, member)?;
                f.write_str(";")?;
            }
            writeln!(f, " }}")?;
        }

        for (no, func) in self.functions.iter().enumerate() {
            write!(f, "function {} {} {}(", no, self.type_name(&func.return_type), func.name)?;
            for (i, param) in func.params().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                self.write_var(f, param)?;
            }
            f.write_str(")")?;
            let locals = func.vars.get(func.nr_args..).unwrap_or_default();
            if !locals.is_empty() {
                f.write_str(" locals:")?;
                for (slot, local) in locals.iter().enumerate() {
                    write!(f, " [{}] ", slot + func.nr_args)?;
                    self.write_var(f, local)?;
                }
            }
            writeln!(f)?;
        }

        for (no, global) in self.globals.iter().enumerate() {
            write!(f, "global {} ", no)?;
            self.write_var(f, global)?;
            if let Some(value) = self.initval_for(no) {
                write!(f, " = {}", value)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Ain, AinType, Function, Initval, InitvalValue};

    #[test]
    fn test_dump_lists_every_table() {
        let mut ain = Ain::new(4);
        let s = ain.add_struct("S");
        let member = ain.make_variable("next", AinType::structure(s));
        ain.structures[s].members.push(member);

        let mut f = Function::new("main", AinType::INT);
        f.vars.push(ain.make_variable("n", AinType::INT));
        f.vars.push(ain.make_variable("tmp", AinType::FLOAT));
        f.nr_args = 1;
        ain.add_function(f);

        let g = ain.add_global("title", AinType::STRING);
        ain.add_initval(Initval {
            global_index: g,
            value: InitvalValue::String("hi".to_string()),
        });

        let text = ain.to_string();
        assert!(text.contains("struct 0 S { struct S next; }"));
        assert!(text.contains("function 0 int main(int n) locals: [1] float tmp"));
        assert!(text.contains("global 0 string title = \"hi\""));
    }
}
