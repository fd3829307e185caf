mod add_node;
mod visualization;
